//! actboard - group activity boards backed by SQLite

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;
mod logging;
mod output;

use std::io;

use anyhow::Result;
use clap::Parser;

use actboard_core::{GroupActivity, Overrides, Settings};

use cli::commands::{
    run_activities, run_group_create, run_group_join, run_group_show, run_init, run_post,
    run_watch,
};
use cli::{Cli, Commands, GroupCommands};
use output::OutputFormat;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    let settings = Settings::resolve(Overrides {
        db_path: cli.db,
        user: cli.user,
        group: cli.group,
    });
    tracing::debug!(?settings, "resolved settings");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Init => {
            run_init(&settings, format, &mut stdout)?;
        }

        Commands::Group(cmd) => match cmd {
            GroupCommands::Create { name } => {
                run_group_create(&settings, &name, format, &mut stdout)?;
            }
            GroupCommands::Join { group, user, other } => {
                run_group_join(
                    &settings,
                    &group,
                    &user,
                    other.as_deref(),
                    format,
                    &mut stdout,
                )?;
            }
            GroupCommands::Show => {
                run_group_show(&settings, format, &mut stdout)?;
            }
        },

        Commands::Post {
            group,
            data,
            added_by,
            value,
            description,
        } => {
            let activity = GroupActivity {
                data,
                added_by: added_by.unwrap_or_else(|| settings.user.clone()),
                value,
                description,
            };
            run_post(&settings, &group, activity, format, &mut stdout)?;
        }

        Commands::Activities => {
            run_activities(&settings, format, &mut stdout)?;
        }

        Commands::Watch => {
            run_watch(
                &settings,
                format,
                io::stdin().lock(),
                &mut stdout,
                &mut io::stderr(),
            )?;
        }
    }

    Ok(())
}
