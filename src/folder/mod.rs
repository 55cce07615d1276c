mod crud;
mod types;

pub use crud::{
    create_folder, fetch_deleted_folders, fetch_folders, purge_deleted_folders, restore_folder,
    soft_delete_folder, update_folder_name, update_folder_pin,
};
pub use types::{CreateFolderOptions, Folder};
