use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use tandem::config::{Config, WorkloadPolicy};
use tandem::core::{DependencyGraph, EdgeId, PersonId, ProjectId, Task, TaskId};
use tandem::engine::{self, ActorContext, DragPayload, Permissions};
use tandem::store::{DependencyStore, MemoryStore};
use tandem::Result;

/// Tandem - task dependency engine over a project snapshot
#[derive(Parser, Debug)]
#[command(name = "tandem")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    TANDEM_DEBUG=1     Enable debug logging (alternative to --debug)\n    TANDEM_LOG=<lvl>   Log level: error, warn, info, debug, trace")]
pub struct Cli {
    /// Project snapshot file (JSON)
    #[arg(short = 's', long)]
    pub snapshot: PathBuf,

    /// Enable debug logging (stderr)
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Person performing the operation
    #[arg(long)]
    pub actor: Option<PersonId>,

    /// Act without the task assignment capability
    #[arg(long)]
    pub no_assign_permission: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Check whether TASK depending on DEPENDS_ON would create a cycle
    CheckCycle { task: TaskId, depends_on: TaskId },

    /// Make TASK depend on DEPENDS_ON
    AddDep { task: TaskId, depends_on: TaskId },

    /// Remove a dependency edge
    RemoveDep { edge: EdgeId },

    /// Show whether a task is blocked and by what
    Blocked { task: TaskId },

    /// Mark a task completed and report newly unblocked dependents
    Complete { task: TaskId },

    /// Rank project members as assignees for a task
    Suggest { task: TaskId },

    /// Validate moving a task between people without applying it
    ValidateMove {
        task: TaskId,
        #[arg(long)]
        from: Option<PersonId>,
        #[arg(long)]
        to: PersonId,
    },

    /// Validate and apply moving a task between people
    Reassign {
        task: TaskId,
        #[arg(long)]
        from: Option<PersonId>,
        #[arg(long)]
        to: PersonId,
    },

    /// Print a project's tasks in dependency order
    Graph { project: ProjectId },
}

impl Command {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Command::AddDep { .. }
                | Command::RemoveDep { .. }
                | Command::Complete { .. }
                | Command::Reassign { .. }
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tandem::log::init_with_debug(cli.debug);

    let policy = Config::load()?.workload_policy();
    let store = MemoryStore::load(&cli.snapshot).await?;
    let ctx = ActorContext::new(
        cli.actor.unwrap_or(PersonId(uuid::Uuid::nil())),
        Permissions {
            can_assign_tasks: !cli.no_assign_permission,
        },
    );
    debug!(command = ?cli.command, actor = %ctx.actor, "tandem");

    run(&cli.command, &store, &ctx, &policy).await?;

    if cli.command.mutates() {
        store.save(&cli.snapshot).await?;
    }
    Ok(())
}

async fn run(
    command: &Command,
    store: &MemoryStore,
    ctx: &ActorContext,
    policy: &WorkloadPolicy,
) -> Result<()> {
    match command {
        Command::CheckCycle { task, depends_on } => {
            let cycle = engine::would_create_cycle(store, *task, *depends_on).await?;
            print_json(&json!({ "would_create_cycle": cycle }))
        }
        Command::AddDep { task, depends_on } => {
            let (edge, audit) = engine::create_dependency(store, ctx, *task, *depends_on).await?;
            print_json(&json!({ "edge": edge, "audit": audit }))
        }
        Command::RemoveDep { edge } => {
            let audit = engine::delete_dependency(store, ctx, *edge).await?;
            print_json(&json!({ "audit": audit }))
        }
        Command::Blocked { task } => {
            let task = store.get_task(*task).await?;
            let state = engine::is_blocked(store, &task).await?;
            print_json(&state)
        }
        Command::Complete { task } => {
            let outcome = engine::complete_task(store, ctx, *task).await?;
            print_json(&outcome)
        }
        Command::Suggest { task } => {
            let task = store.get_task(*task).await?;
            let members = store.get_project_members(task.project_id).await?;
            let mut tasks: Vec<Task> = Vec::new();
            for member in &members {
                for assigned in store.get_person_tasks(member.id).await? {
                    if !tasks.iter().any(|t| t.id == assigned.id) {
                        tasks.push(assigned);
                    }
                }
            }
            let ranked = engine::suggest_assignees(&task, &members, &tasks, policy);
            print_json(&ranked)
        }
        Command::ValidateMove { task, from, to } => {
            let payload = DragPayload::new(*task, *from);
            let validation = engine::validate_move(store, ctx, &payload, Some(*to), policy).await?;
            print_json(&validation)
        }
        Command::Reassign { task, from, to } => {
            let payload = DragPayload::new(*task, *from);
            let outcome = engine::reassign_task(store, ctx, &payload, Some(*to), policy).await?;
            print_json(&outcome)
        }
        Command::Graph { project } => {
            let edges = store.get_project_edges(*project).await?;
            let tasks = store.get_project_tasks(*project).await?;
            let mut graph = DependencyGraph::from_edges(&edges);
            for task in &tasks {
                graph.add_task(task.id);
            }
            let order: Vec<serde_json::Value> = graph
                .topological_order()?
                .into_iter()
                .filter_map(|id| tasks.iter().find(|t| t.id == id))
                .map(|t| {
                    json!({
                        "id": t.id,
                        "name": t.name,
                        "status": t.status,
                        "completion": t.completion_percentage(),
                        "depends_on": graph.dependencies_of(&t.id),
                    })
                })
                .collect();
            print_json(&order)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
