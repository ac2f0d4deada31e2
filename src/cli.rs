// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use clap::Subcommand;

use crate::cmd::add::add_card;
use crate::cmd::check::check_collection;
use crate::cmd::drill::drill;
use crate::cmd::folder::create_folder;
use crate::cmd::folder::delete_folder;
use crate::cmd::folder::list_folders;
use crate::cmd::folder::reset_folder_stats;
use crate::cmd::stats::print_stats;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Review the due cards of a folder.
    Drill {
        /// The folder's id or name.
        folder: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// Add a card to a folder.
    Add {
        /// The folder's id or name.
        folder: String,
        front: String,
        back: String,
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// Manage folders.
    Folder {
        #[command(subcommand)]
        command: FolderCommand,
    },
    /// Print collection statistics as JSON.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// Check the collection for duplicate ids and orphaned cards.
    Check {
        /// Path to the collection directory. By default, the current working directory is used.
        #[arg(short, long)]
        directory: Option<String>,
        /// Repair the problems found.
        #[arg(long)]
        fix: bool,
    },
}

#[derive(Subcommand)]
enum FolderCommand {
    /// Create a folder.
    Add {
        name: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// Delete a folder. Its cards move to the uncategorized folder.
    Rm {
        id: String,
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// Zero the review statistics of a folder's cards, keeping their schedule.
    Reset {
        /// The folder's id or name.
        id: String,
        #[arg(short, long)]
        directory: Option<String>,
    },
    /// List folders with their card counts.
    Ls {
        #[arg(short, long)]
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill { folder, directory } => drill(directory, folder),
        Command::Add {
            folder,
            front,
            back,
            directory,
        } => add_card(directory, folder, front, back),
        Command::Folder { command } => match command {
            FolderCommand::Add {
                name,
                color,
                icon,
                directory,
            } => create_folder(directory, name, color, icon),
            FolderCommand::Rm { id, directory } => delete_folder(directory, id),
            FolderCommand::Reset { id, directory } => reset_folder_stats(directory, id),
            FolderCommand::Ls { directory } => list_folders(directory),
        },
        Command::Stats { directory } => print_stats(directory),
        Command::Check { directory, fix } => check_collection(directory, fix),
    }
}
