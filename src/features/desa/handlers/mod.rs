pub mod desa_handler;

pub use desa_handler::{
    __path_create_desa, __path_delete_desa, __path_get_desa, __path_list_desa,
    __path_update_desa, create_desa, delete_desa, get_desa, list_desa, update_desa,
};
