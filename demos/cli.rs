use anyhow::Result;
use std::env;
use syno_file_station::client::SynoFSBuilder;
use syno_file_station::request::{ListOptions, ShareListOptions};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let synofs = SynoFSBuilder::from_env()?.build()?;
    let folder = env::args().nth(1).unwrap_or_else(|| String::from("/home"));

    synofs.authorize().await?;

    let info = synofs.get_info().await?;
    println!("host: {}, manager: {}", info.hostname, info.is_manager);

    let shares = synofs
        .get_shares(&ShareListOptions {
            additional: true,
            ..Default::default()
        })
        .await?;
    for share in &shares.shares {
        let free = share
            .additional
            .as_ref()
            .and_then(|additional| additional.volume_status.as_ref())
            .map(|status| status.calculate_free_space())
            .unwrap_or_default();
        println!("share: {}, free: {}", share.path, free);
    }

    let options = ListOptions {
        additional: true,
        ..ListOptions::new(folder)
    };
    let list = synofs.get_list(&options).await?;
    for file in list.files {
        let perm = file
            .additional
            .as_ref()
            .and_then(|additional| additional.perm.as_ref())
            .map(|perm| perm.posix_string())
            .unwrap_or_default();
        println!("{perm} {:>12} {}", file.calculate_size(), file.path);
    }

    synofs.logout().await?;

    Ok(())
}
