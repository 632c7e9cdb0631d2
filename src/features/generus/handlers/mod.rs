pub mod generus_handler;

pub use generus_handler::{
    __path_create_generus, __path_delete_generus, __path_get_generus, __path_list_generus,
    __path_update_generus, create_generus, delete_generus, get_generus, list_generus,
    update_generus,
};
