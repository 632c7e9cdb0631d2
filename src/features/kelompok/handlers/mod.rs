pub mod kelompok_handler;

pub use kelompok_handler::{
    __path_create_kelompok, __path_delete_kelompok, __path_get_kelompok, __path_list_kelompok,
    __path_update_kelompok, create_kelompok, delete_kelompok, get_kelompok, list_kelompok,
    update_kelompok,
};
