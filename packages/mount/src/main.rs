use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// mosaicfs - union filesystem mount front-end
///
/// Presents a colon-delimited list of branch directories as one logical
/// tree, routed by per-call branch selection policies.
#[derive(Parser, Debug)]
#[command(name = "mosaicfs")]
#[command(author, version, about)]
#[command(after_help = "\
BRANCHES
    ':' delimited list of directories. Each element is
    path[=RW|RO|NC[,<minfreespace bytes>]] and the path part supports
    shell globbing (escape it from your shell).

MOUNT OPTIONS (-o, comma separated, repeatable)
    minfreespace=<int>         free-space floor for create policies
    moveonenospc=<bool>        retry writes on another branch on ENOSPC
    dropcacheonclose=<bool>    drop page cache on close
    symlinkify=<bool>          expose stale read-only files as symlinks
    symlinkify_timeout=<int>   staleness threshold in seconds
    nullrw=<bool>              discard reads/writes (benchmarking)
    ignorepponrename=<bool>    drop path preservation for rename/link
    security_capability=<bool> expose security.capability xattr
    link_cow=<bool>            break hardlinks on open (copy-on-write)
    xattr=passthrough|noattr|nosys
    statfs=base|full           statfs aggregation scope
    statfs_ignore=none|ro|nc   branches excluded from free-space totals
    hard_remove, direct_io, kernel_cache, auto_cache
    entry_timeout=<float>, negative_timeout=<float>,
    attr_timeout=<float>, ac_attr_timeout=<float>
    func.<call>=<policy>       bind one call to a policy
    category.<category>=<policy>
                               bind a whole category (search/create/action)

    Booleans accept exactly 'true' or 'false'. Unknown keys are fatal.")]
struct Args {
    /// Colon-delimited branch directories
    branches: String,

    /// Mount point
    mountpoint: PathBuf,

    /// Mount options
    #[arg(short = 'o', value_name = "opt,...")]
    options: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let plan = match mosaicfs_mount::plan(&args.branches, &args.mountpoint, &args.options) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("mosaicfs: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = plan.handle.snapshot();
    info!(
        fsname = %plan.fsname,
        subtype = plan.subtype,
        mount_point = %plan.mount_point.display(),
        branches = config.branches().len(),
        "mount plan validated"
    );

    // The FUSE session itself is owned by the host filesystem layer; the
    // engine hands it the validated handle and presentation metadata.
    println!(
        "mosaicfs: {} branch(es) -> {} (fsname={}, subtype={})",
        config.branches().len(),
        plan.mount_point.display(),
        plan.fsname,
        plan.subtype
    );

    ExitCode::SUCCESS
}
