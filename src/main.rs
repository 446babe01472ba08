use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use twig::artifacts::diff::line_diff::ContentDiff;
use twig::artifacts::diff::tree_diff::DiffFilter;
use twig::artifacts::objects::object_type::ObjectType;
use twig::commands::porcelain::merge::MergeOutcome;
use twig::commands::porcelain::rebase::RebaseOutcome;
use twig::{Config, Error, Repository};

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small content-addressed version-control engine",
    long_about = "twig stores snapshots of a directory as content-addressed objects \
    and keeps single-parent history on named branches. Branches can be merged, \
    rebased and diffed.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(name = "add", about = "Stage files for the next commit")]
    Add {
        #[arg(index = 1, required = true, help = "Files or directories to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(name = "rm", about = "Stage the removal of a tracked file")]
    Rm {
        #[arg(index = 1)]
        path: PathBuf,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged changes as a new commit on the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the history of a revision")]
    Log {
        #[arg(index = 1, help = "Revision to start from (default: HEAD)")]
        revision: Option<String>,
        #[arg(long, help = "One line per commit")]
        oneline: bool,
    },
    #[command(name = "branch", about = "List, create or delete branches")]
    Branch {
        #[arg(index = 1, help = "Name of the branch to create")]
        name: Option<String>,
        #[arg(index = 2, help = "Revision the new branch starts at")]
        start: Option<String>,
        #[arg(short, long, help = "Delete the named branch")]
        delete: bool,
    },
    #[command(name = "switch", about = "Make another branch current")]
    Switch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "tag", about = "List, create or delete tags")]
    Tag {
        #[arg(index = 1, help = "Name of the tag to create")]
        name: Option<String>,
        #[arg(index = 2, help = "Revision to tag (default: HEAD)")]
        revision: Option<String>,
        #[arg(short, long, help = "Delete the named tag")]
        delete: bool,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        source: String,
    },
    #[command(name = "rebase", about = "Replay the current branch on top of another")]
    Rebase {
        #[arg(index = 1)]
        target: String,
    },
    #[command(name = "diff", about = "Show changes between two revisions")]
    Diff {
        #[arg(index = 1)]
        old: String,
        #[arg(index = 2)]
        new: String,
        #[arg(long = "diff-filter", help = "Only show some statuses, e.g. AM")]
        diff_filter: Option<String>,
        #[arg(long, help = "Only list changed paths with their status")]
        name_status: bool,
    },
    #[command(name = "stash", about = "Save or restore staged changes")]
    Stash {
        #[command(subcommand)]
        action: Option<StashAction>,
    },
    #[command(name = "clone", about = "Copy a repository with its history")]
    Clone {
        #[arg(index = 1)]
        source: PathBuf,
        #[arg(index = 2)]
        destination: PathBuf,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes a file as a blob and can write it to the object database. \
        It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository. \
        It requires the SHA of the object to be specified."
    )]
    CatFile {
        #[arg(short = 't', long = "type", help = "Expected object kind (blob, tree, commit)")]
        kind: Option<String>,
        #[arg(index = 1, help = "The object SHA to print")]
        sha: String,
    },
}

#[derive(Subcommand)]
enum StashAction {
    Push,
    Pop,
    List,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TWIG_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error.downcast_ref::<Error>() {
                Some(Error::MergeConflict { paths }) => {
                    eprintln!("{}", "Automatic merge failed; fix conflicts in:".red());
                    for path in paths {
                        eprintln!("\t{}", path.red());
                    }
                }
                _ => eprintln!("{} {error:#}", "error:".red().bold()),
            }

            ExitCode::FAILURE
        }
    }
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Ok(Repository::open(pwd, Config::from_env()?)?)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => path,
                None => std::env::current_dir()?,
            };
            let repository = Repository::init(&path, Config::from_env()?)?;

            println!(
                "Initialized empty twig repository in {}",
                repository.private_path().display()
            );
        }
        Commands::Add { paths } => {
            let repository = open_repository()?;
            for (path, oid) in repository.add(&paths)? {
                println!("{} {path}", oid.to_short_oid());
            }
        }
        Commands::Rm { path } => {
            let repository = open_repository()?;
            let path = repository.remove(&path)?;
            println!("rm '{path}'");
        }
        Commands::Commit { message } => {
            let repository = open_repository()?;
            let oid = repository.commit(&message)?;
            let branch = repository.refs().current_branch()?;

            println!("[{branch} {}] {}", oid.to_short_oid(), first_line(&message));
        }
        Commands::Log { revision, oneline } => {
            let repository = open_repository()?;
            for (oid, commit) in repository.log(revision.as_deref())? {
                if oneline {
                    println!("{} {}", oid.to_short_oid().yellow(), commit.short_message());
                    continue;
                }

                println!("{}", format!("commit {oid}").yellow());
                println!("Author: {}", commit.author().display_name());
                println!("Date:   {}", commit.author().readable_timestamp());
                println!();
                for line in commit.message().lines() {
                    println!("    {line}");
                }
                println!();
            }
        }
        Commands::Branch {
            name,
            start,
            delete,
        } => {
            let repository = open_repository()?;
            match (name, delete) {
                (Some(name), true) => {
                    let tip = repository.delete_branch(&name)?;
                    let tip = tip.map(|oid| oid.to_short_oid()).unwrap_or_default();
                    println!("Deleted branch {name} (was {tip}).");
                }
                (Some(name), false) => {
                    repository.create_branch(&name, start.as_deref())?;
                }
                (None, true) => anyhow::bail!("branch name required"),
                (None, false) => {
                    for branch in repository.list_branches()? {
                        if branch.current {
                            println!("* {}", branch.name.to_string().green());
                        } else {
                            println!("  {}", branch.name);
                        }
                    }
                }
            }
        }
        Commands::Switch { name } => {
            let repository = open_repository()?;
            repository.switch(&name)?;
            println!("Switched to branch '{name}'");
        }
        Commands::Tag {
            name,
            revision,
            delete,
        } => {
            let repository = open_repository()?;
            match (name, delete) {
                (Some(name), true) => {
                    let oid = repository.delete_tag(&name)?;
                    println!("Deleted tag '{name}' (was {})", oid.to_short_oid());
                }
                (Some(name), false) => {
                    repository.create_tag(&name, revision.as_deref())?;
                }
                (None, true) => anyhow::bail!("tag name required"),
                (None, false) => {
                    for (name, _) in repository.list_tags()? {
                        println!("{name}");
                    }
                }
            }
        }
        Commands::Merge { source } => {
            let repository = open_repository()?;
            match repository.merge(&source)? {
                MergeOutcome::UpToDate => println!("Already up to date."),
                MergeOutcome::Moved(oid) => {
                    println!("Merged {source}, now at {}", oid.to_short_oid())
                }
            }
        }
        Commands::Rebase { target } => {
            let repository = open_repository()?;
            match repository.rebase(&target)? {
                RebaseOutcome::NothingToRebase => println!("Nothing to rebase."),
                RebaseOutcome::Rebased { new_tip, replayed } => println!(
                    "Rebased {} commit(s) onto {target}, now at {}",
                    replayed.len(),
                    new_tip.to_short_oid()
                ),
            }
        }
        Commands::Diff {
            old,
            new,
            diff_filter,
            name_status,
        } => {
            let repository = open_repository()?;
            let filter = diff_filter
                .map(|letters| {
                    DiffFilter::try_parse(&letters)
                        .with_context(|| format!("invalid diff filter {letters:?}"))
                })
                .transpose()?;

            for file in repository.diff(&old, &new, filter)? {
                if name_status {
                    println!("{}\t{}", file.change.status_char(), file.path);
                    continue;
                }

                println!("{}", format!("diff --twig a/{} b/{}", file.path, file.path).bold());
                match &file.content {
                    ContentDiff::Binary => println!("Binary files differ"),
                    ContentDiff::Lines(edits) => {
                        for edit in edits {
                            let line = format!("{}{}", edit.marker(), edit.text());
                            match edit.marker() {
                                '-' => println!("{}", line.red()),
                                _ => println!("{}", line.green()),
                            }
                        }
                    }
                }
            }
        }
        Commands::Stash { action } => {
            let repository = open_repository()?;
            match action.unwrap_or(StashAction::Push) {
                StashAction::Push => {
                    let id = repository.stash_push()?;
                    println!("Saved staged changes as stash {id}");
                }
                StashAction::Pop => {
                    let id = repository.stash_pop()?;
                    println!("Restored stash {id}");
                }
                StashAction::List => {
                    for id in repository.stash_list()? {
                        println!("{id}");
                    }
                }
            }
        }
        Commands::Clone {
            source,
            destination,
        } => {
            let (repository, summary) =
                Repository::clone_repository(&source, &destination, Config::from_env()?)?;
            println!(
                "Cloned into {} ({} working file(s), {} repository file(s))",
                repository.path().display(),
                summary.working_files,
                summary.private_files
            );
        }
        Commands::HashObject { write, file } => {
            let repository = open_repository()?;
            println!("{}", repository.hash_object(&file, write)?);
        }
        Commands::CatFile { kind, sha } => {
            let repository = open_repository()?;
            let kind = kind
                .map(|kind| ObjectType::try_from(kind.as_str()))
                .transpose()?;
            println!("{}", repository.cat_file(kind, &sha)?.display());
        }
    }

    Ok(())
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}
