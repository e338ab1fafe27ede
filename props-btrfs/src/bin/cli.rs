// SPDX-License-Identifier: GPL-3.0-only

//! CLI wrapper around props-btrfs for testing and manual operations

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use props_btrfs::{ObjectType, descriptors, dispatch};
use std::path::PathBuf;

/// Property tool for btrfs objects
#[derive(Parser)]
#[command(name = "props-btrfs-cli")]
#[command(about = "Get and set properties of btrfs objects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all known properties
    List,
    /// Get the value of a property
    Get {
        /// The kind of object the path names
        object_type: ObjectTypeArg,
        /// Path to the object
        path: PathBuf,
        /// Property name
        name: String,
    },
    /// Set the value of a property
    Set {
        /// The kind of object the path names
        object_type: ObjectTypeArg,
        /// Path to the object
        path: PathBuf,
        /// Property name
        name: String,
        /// New value
        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ObjectTypeArg {
    Subvolume,
    Device,
    Filesystem,
    Inode,
}

impl From<ObjectTypeArg> for ObjectType {
    fn from(arg: ObjectTypeArg) -> Self {
        match arg {
            ObjectTypeArg::Subvolume => ObjectType::Subvolume,
            ObjectTypeArg::Device => ObjectType::Device,
            ObjectTypeArg::Filesystem => ObjectType::FilesystemRoot,
            ObjectTypeArg::Inode => ObjectType::Inode,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interfere with property output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            let infos: Vec<_> = descriptors().map(|prop| prop.info()).collect();
            let json = serde_json::to_string_pretty(&infos)?;
            println!("{json}");
        }
        Commands::Get {
            object_type,
            path,
            name,
        } => {
            dispatch(object_type.into(), &path, &name, None)?;
        }
        Commands::Set {
            object_type,
            path,
            name,
            value,
        } => {
            dispatch(object_type.into(), &path, &name, Some(&value))?;
        }
    }

    Ok(())
}
