//! Command dispatch and handlers

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, OrderedListUpdater};
use crate::cli::args::{Cli, Commands, ListArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{EditOutcome, ListKey, Selection, TaskId, TreeNodeConvert, ROOT_TASK_ID};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Execute the CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config) => {
            let settings = load_settings(cli)?;
            output::data(&settings.to_toml()?);
            Ok(())
        }
        Some(command) => {
            let container = ServiceContainer::new(load_settings(cli)?)?;
            dispatch(&container, command)
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
    }
}

/// Settings from the current directory, with `--base-dir` taking precedence.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let cwd = std::env::current_dir().ok();
    let mut settings = Settings::load(cwd.as_deref())?;
    if let Some(base_dir) = &cli.base_dir {
        settings.base_dir = base_dir.clone();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn dispatch(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Show { list } => cmd_show(container, list),
        Commands::Ids { list, indent } => cmd_ids(container, list, *indent),
        Commands::Order { list } => cmd_order(container, list),
        Commands::Indent { list, task } => {
            edit(container, list, "indented", *task, |u| u.indent(*task, 1))
        }
        Commands::Outdent { list, task } => {
            edit(container, list, "outdented", *task, |u| u.indent(*task, -1))
        }
        Commands::Move {
            list,
            task,
            before,
            end,
        } => {
            let before_id = match (before, end) {
                (Some(id), false) => *id,
                (None, true) => ROOT_TASK_ID,
                _ => {
                    return Err(CliError::InvalidArgs(
                        "exactly one of --before or --end is required".into(),
                    ))
                }
            };
            edit(container, list, "moved", *task, |u| u.move_to(*task, before_id))
        }
        Commands::MoveBeside {
            list,
            task,
            reference,
        } => edit(container, list, "moved", *task, |u| {
            u.move_to_parent_of(*task, *reference)
        }),
        Commands::Create { list, task } => {
            edit(container, list, "created", *task, |u| u.on_create_task(*task))
        }
        Commands::Delete { list, task } => {
            edit(container, list, "deleted", *task, |u| u.on_delete_task(*task))
        }
        Commands::Sync { list } => cmd_sync(container, list),
        Commands::Config | Commands::Completion { .. } => Ok(()),
    }
}

fn open(container: &ServiceContainer, args: &ListArgs) -> CliResult<OrderedListUpdater> {
    let list = ListKey::new(&args.list).map_err(ApplicationError::from)?;
    // Selection names are file stems too
    let selection_name = match &args.selection {
        Some(name) => ListKey::new(name).map_err(ApplicationError::from)?,
        None => list.clone(),
    };
    let selection = Selection::named(selection_name.as_str());
    Ok(container.open_list(list, selection)?)
}

#[instrument(level = "debug", skip(container))]
fn cmd_show(container: &ServiceContainer, args: &ListArgs) -> CliResult<()> {
    let updater = open(container, args)?;
    if updater.tree().is_empty() {
        output::warning(&format!("list {} is empty", updater.list()));
        return Ok(());
    }
    output::data(&updater.tree().to_tree_string(updater.list().as_str()));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_ids(container: &ServiceContainer, args: &ListArgs, with_indent: bool) -> CliResult<()> {
    let updater = open(container, args)?;
    for id in updater.ordered_ids() {
        if with_indent {
            output::data(&format!("{}\t{}", id, updater.indent_for_task(id)));
        } else {
            output::data(&id);
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_order(container: &ServiceContainer, args: &ListArgs) -> CliResult<()> {
    let updater = open(container, args)?;
    output::data(&updater.order_string());
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_sync(container: &ServiceContainer, args: &ListArgs) -> CliResult<()> {
    let updater = open(container, args)?;
    let report = updater.repaired();
    if report.is_empty() {
        output::success(&format!("{} is in sync", updater.list()));
        return Ok(());
    }
    output::list_header(updater.list());
    report.added.iter().for_each(|&id| output::task_added(id));
    report.removed.iter().for_each(|&id| output::task_removed(id));
    Ok(())
}

fn edit<F>(
    container: &ServiceContainer,
    args: &ListArgs,
    verb: &str,
    task: TaskId,
    op: F,
) -> CliResult<()>
where
    F: FnOnce(&mut OrderedListUpdater) -> crate::application::ApplicationResult<EditOutcome>,
{
    let mut updater = open(container, args)?;
    let outcome = op(&mut updater)?;
    output::edit_result(verb, task, outcome, &updater.serialized());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::TestCollaborators;

    fn container() -> ServiceContainer {
        let list = ListKey::new("inbox").unwrap();
        let test = TestCollaborators::new(&list, "[-1,1]", [1]);
        ServiceContainer::with_deps(Settings::default(), test.collaborators())
    }

    #[test]
    fn given_path_like_selection_when_opening_then_usage_error() {
        let args = ListArgs {
            list: "inbox".into(),
            selection: Some("../../etc/x".into()),
        };
        let err = open(&container(), &args).err().unwrap();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn given_no_selection_when_opening_then_list_key_used() {
        let args = ListArgs {
            list: "inbox".into(),
            selection: None,
        };
        let updater = open(&container(), &args).unwrap();
        assert_eq!(updater.selection().name, "inbox");
        assert_eq!(updater.serialized(), "[-1,1]");
    }
}
