//!# Synology File Station API Client
//!
//! A Rust client library for interacting with the Synology File Station API. Browse, upload,
//! download and manage files on your NAS programmatically with a strongly-typed interface.
//!
//! ## Features
//!
//! - Authentication with Synology API
//! - File Station capability info
//! - List shared folders, list and search folders
//! - Get detailed file information (owner, times, permissions, volume status)
//! - Download and upload files
//! - Create folders and delete files or folders
//! - Human-readable file sizes, free space and POSIX permissions
//!
//! ## Usage example
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use syno_file_station::client::SynoFS;
//! use syno_file_station::request::{ListOptions, ShareListOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let synofs = SynoFS::builder()
//!         .address("nas.local")
//!         .protocol("https")
//!         .username("bob")
//!         .password("secret")
//!         .build()?;
//!
//!     synofs.authorize().await?;
//!
//!     let shares = synofs.get_shares(&ShareListOptions::default()).await?;
//!     for share in shares.shares {
//!         println!("share: {}, path: {}", share.name, share.path);
//!     }
//!
//!     let options = ListOptions {
//!         additional: true,
//!         ..ListOptions::new("/home")
//!     };
//!     let list = synofs.search("*.txt", &options).await?;
//!     for file in list.files {
//!         println!("{} {}", file.path, file.calculate_size());
//!     }
//!
//!     synofs.logout().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod entities;
pub mod request;
pub mod utils;
