pub mod admin_handler;
pub mod public_handler;

pub use admin_handler::{
    __path_delete_presence, __path_list_event_presences, delete_presence, list_event_presences,
};
pub use public_handler::{
    __path_check_eligibility, __path_create_presence, __path_get_counts,
    __path_get_public_event, __path_get_roster, check_eligibility, create_presence, get_counts,
    get_public_event, get_roster,
};
