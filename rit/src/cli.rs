//! Hand-rolled argument dispatch. No argument-parsing crate here: every
//! message below is a literal the test suite compares against, and a
//! general-purpose parser's auto-generated usage/error text would not match.

use anyhow::Result;
use librit::cmd;
use librit::repo::{InitOutcome, Repository, ALREADY_EXISTS_MESSAGE, NOT_INITIALIZED_MESSAGE};
use std::ffi::OsString;
use std::path::PathBuf;

const KNOWN_COMMANDS: &[&str] = &[
    "init", "add", "commit", "rm", "log", "global-log", "find", "status", "checkout", "branch",
    "rm-branch", "reset", "merge", "add-remote", "rm-remote", "push", "fetch", "pull",
];

pub fn run<T: Into<OsString> + Clone>(args: impl IntoIterator<Item = T>) -> Result<()> {
    let mut args: Vec<String> =
        args.into_iter().skip(1).map(|a| a.into().to_string_lossy().into_owned()).collect();

    // `-C <path>` runs as if invoked with `<path>` as the working directory,
    // the same override `bit`'s own CLI accepts -- stripped before the
    // regular command/operand parsing below ever sees it.
    let mut root = std::env::current_dir()?;
    if args.first().map(String::as_str) == Some("-C") {
        let Some(path) = args.get(1) else {
            println!("Incorrect operands.");
            return Ok(());
        };
        root = PathBuf::from(path);
        args.drain(0..2);
    }

    let Some(command) = args.first() else {
        println!("Please enter a command.");
        return Ok(());
    };
    let operands = &args[1..];

    if !KNOWN_COMMANDS.contains(&command.as_str()) {
        println!("No command with that name exists.");
        return Ok(());
    }

    if command == "init" {
        return run_init(&root, operands);
    }

    let Some(mut repo) = Repository::load(root.clone())? else {
        println!("{}", NOT_INITIALIZED_MESSAGE);
        return Ok(());
    };

    match dispatch(&mut repo, command, operands)? {
        Dispatch::WrongArity => println!("Incorrect operands."),
        Dispatch::Message(Some(msg)) => println!("{}", msg),
        Dispatch::Message(None) => {}
        Dispatch::Text(text) => print!("{}", text),
    }
    Ok(())
}

fn run_init(root: &std::path::Path, operands: &[String]) -> Result<()> {
    if !operands.is_empty() {
        println!("Incorrect operands.");
        return Ok(());
    }
    match Repository::init(root.to_path_buf())? {
        InitOutcome::Created(_) => {}
        InitOutcome::AlreadyExists => println!("{}", ALREADY_EXISTS_MESSAGE),
    }
    Ok(())
}

enum Dispatch {
    WrongArity,
    Message(Option<String>),
    Text(String),
}

macro_rules! need {
    ($operands:expr, $n:expr) => {
        if $operands.len() != $n {
            return Ok(Dispatch::WrongArity);
        }
    };
}

fn dispatch(repo: &mut Repository, command: &str, operands: &[String]) -> Result<Dispatch> {
    Ok(match command {
        "add" => {
            need!(operands, 1);
            Dispatch::Message(cmd::cmd_add(repo, &operands[0])?)
        }
        "rm" => {
            need!(operands, 1);
            Dispatch::Message(cmd::cmd_rm(repo, &operands[0])?)
        }
        "commit" => {
            need!(operands, 1);
            Dispatch::Message(cmd::cmd_commit(repo, &operands[0])?)
        }
        "log" => {
            need!(operands, 0);
            Dispatch::Text(cmd::cmd_log(repo))
        }
        "global-log" => {
            need!(operands, 0);
            Dispatch::Text(cmd::cmd_global_log(repo))
        }
        "find" => {
            need!(operands, 1);
            Dispatch::Text(cmd::cmd_find(repo, &operands[0]))
        }
        "status" => {
            need!(operands, 0);
            Dispatch::Text(cmd::cmd_status(repo)?)
        }
        "checkout" => return checkout(repo, operands),
        "branch" => {
            need!(operands, 1);
            Dispatch::Message(cmd::cmd_branch(repo, &operands[0])?)
        }
        "rm-branch" => {
            need!(operands, 1);
            Dispatch::Message(cmd::cmd_rm_branch(repo, &operands[0])?)
        }
        "reset" => {
            need!(operands, 1);
            Dispatch::Message(cmd::cmd_reset(repo, &operands[0])?)
        }
        "merge" => {
            need!(operands, 1);
            Dispatch::Message(cmd::cmd_merge(repo, &operands[0])?)
        }
        "add-remote" => {
            need!(operands, 2);
            Dispatch::Message(cmd::cmd_add_remote(repo, &operands[0], &operands[1])?)
        }
        "rm-remote" => {
            need!(operands, 1);
            Dispatch::Message(cmd::cmd_rm_remote(repo, &operands[0])?)
        }
        "push" => {
            need!(operands, 2);
            Dispatch::Message(cmd::cmd_push(repo, &operands[0], &operands[1])?)
        }
        "fetch" => {
            need!(operands, 2);
            Dispatch::Message(cmd::cmd_fetch(repo, &operands[0], &operands[1])?)
        }
        "pull" => {
            need!(operands, 2);
            Dispatch::Message(cmd::cmd_pull(repo, &operands[0], &operands[1])?)
        }
        _ => unreachable!("filtered by KNOWN_COMMANDS"),
    })
}

fn checkout(repo: &mut Repository, operands: &[String]) -> Result<Dispatch> {
    match operands {
        [dash, file] if dash == "--" => Ok(Dispatch::Message(cmd::cmd_checkout_file(repo, file)?)),
        [commit_id, dash, file] if dash == "--" => {
            Ok(Dispatch::Message(cmd::cmd_checkout_commit_file(repo, commit_id, file)?))
        }
        [branch] => Ok(Dispatch::Message(cmd::cmd_checkout_branch(repo, branch)?)),
        _ => Ok(Dispatch::WrongArity),
    }
}
