/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Super admin role - full back-office access including the audit log
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Admin role - manages desa, kelompok, generus, events and presences
pub const ROLE_ADMIN: &str = "admin";

/// Actor recorded in the audit log for unauthenticated check-ins
pub const PUBLIC_ACTOR: &str = "public";

// =============================================================================
// CHECK-IN
// =============================================================================

/// Default geofence radius around an event location, in kilometers
pub const DEFAULT_CHECKIN_RADIUS_KM: f64 = 1.0;
