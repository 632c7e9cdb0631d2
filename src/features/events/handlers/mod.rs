pub mod event_handler;

pub use event_handler::{
    __path_create_event, __path_delete_event, __path_get_event, __path_list_events,
    __path_update_event, create_event, delete_event, get_event, list_events, update_event,
};
