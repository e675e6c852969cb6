//! Movie input producers
//!
//! Every source normalizes to the same [`MovieInput`](crate::models::MovieInput)
//! record: a walked local file tree, or an inventory export from a media
//! server (Plex, DLNA) in CSV or JSON form.

pub mod inventory;
pub mod local;
