#[macro_use]
extern crate log;

use std::path::PathBuf;

use argh::FromArgs;

use smb_share::{
    fmt_size, today_folder, upload_batch, CancelToken, MediaKind, ShareClient, ShareCredentials,
    ShareOptions, UploadItem, UploadStage, DEFAULT_SHARE_NAME,
};

#[derive(FromArgs)]
#[argh(description = "
browse and upload media on a SMB share

where positional is: address[:port]")]
struct Args {
    #[argh(option, short = 'P', description = "specify password")]
    password: Option<String>,
    #[argh(option, short = 'u', description = "specify username")]
    username: String,
    #[argh(
        option,
        short = 's',
        default = "DEFAULT_SHARE_NAME.to_string()",
        description = "specify share"
    )]
    share: String,
    #[argh(
        option,
        short = 'w',
        default = r#""WORKGROUP".to_string()"#,
        description = "specify workgroup"
    )]
    workgroup: String,
    #[argh(
        option,
        short = 'p',
        default = "String::new()",
        description = "folder to list, relative to the share root"
    )]
    path: String,
    #[argh(
        option,
        description = "upload files into a dated folder under this folder"
    )]
    upload_to: Option<String>,
    #[argh(positional, description = "address[:port] of the server")]
    server: String,
    #[argh(positional, description = "local files to upload")]
    files: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    assert!(env_logger::builder().try_init().is_ok());
    let args: Args = argh::from_env();
    let password = match &args.password {
        Some(p) => p.clone(),
        None => read_secret_from_tty("Password: ")?,
    };

    info!(
        "initializing client with server {} and share {}, with username {} and workgroup {}",
        args.server, args.share, args.username, args.workgroup
    );
    let credentials = ShareCredentials::new(&args.server, &args.username, &password);
    let mut client = ShareClient::with_options(
        credentials.share(&args.share),
        ShareOptions::default().workgroup(&args.workgroup),
    );

    info!("connecting to {}...", client.base_path());
    client.initialize()?;
    if !client.test_connection() {
        anyhow::bail!("share {} is not reachable", client.base_path());
    }
    info!("client connected");

    if let Some(selected) = args.upload_to.as_deref() {
        let destination = today_folder(selected);
        let items = args
            .files
            .iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                Ok(UploadItem::new(name, std::fs::File::open(path)?))
            })
            .collect::<std::io::Result<Vec<_>>>()?;
        let cancel = CancelToken::new();
        watch_stdin(cancel.clone());
        println!("type q and press enter to stop after the current file");
        let report = upload_batch(&mut client, items, &destination, &cancel, |p| {
            if let UploadStage::Completed { bytes } = p.stage {
                let size = fmt_size(bytes);
                println!("[{}/{}] {} ({})", p.current, p.total, p.file_name, size);
            }
        })?;
        println!(
            "uploaded {} files ({}) to {}{}",
            report.uploaded.len(),
            fmt_size(report.bytes()),
            client.resolve(&destination),
            if report.cancelled { " (cancelled)" } else { "" }
        );
    }

    info!("listing files at {}", client.resolve(&args.path));
    for entry in client.list_files(&args.path) {
        let kind = match (entry.is_directory(), entry.media_kind()) {
            (true, _) => "dir",
            (false, MediaKind::Image) => "image",
            (false, MediaKind::Video) => "video",
            (false, MediaKind::Other) => "file",
        };
        println!("{:<6} {:>8} {}", kind, fmt_size(entry.size()), entry.name());
    }

    Ok(())
}

/// Cancel `token` when `q` is read from stdin
fn watch_stdin(token: CancelToken) {
    std::thread::spawn(move || {
        let mut line = String::new();
        while std::io::stdin().read_line(&mut line).unwrap_or(0) > 0 {
            if line.trim() == "q" {
                token.cancel();
                break;
            }
            line.clear();
        }
    });
}

/// Read a secret from tty with customisable prompt
fn read_secret_from_tty(prompt: &str) -> std::io::Result<String> {
    rpassword::prompt_password(prompt)
}
