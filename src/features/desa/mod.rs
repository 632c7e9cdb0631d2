//! Desa (village) management for the back-office.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/admin/desa` | List desa |
//! | POST | `/api/admin/desa` | Create desa |
//! | GET | `/api/admin/desa/{id}` | Get desa |
//! | PUT | `/api/admin/desa/{id}` | Rename desa |
//! | DELETE | `/api/admin/desa/{id}` | Delete desa |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::DesaService;
