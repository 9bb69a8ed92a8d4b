use std::io::{self, BufRead};

use anyhow::{bail, ensure, Result};

use indexer_core::{parse_query, KeywordCounts, QueryTarget, ScanType, SummaryCounts};
use indexer_engine::Engine;

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    AddDirectory(String),
    AddUrl(String),
    Get(String),
    Query(String),
    ClearFileSummary,
    ClearWebSummary,
    Links(String),
    Help,
    Stop,
}

/// Reads commands from stdin until `stop` or end of input. A failing
/// command reports its error and the loop carries on.
pub fn run(engine: &Engine) {
    log::info!("console is now running, type 'help' for commands");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_command(line) {
            Ok(Command::Stop) => break,
            Ok(command) => {
                if let Err(err) = apply(engine, command) {
                    log::error!("command error: {err}");
                }
            }
            Err(err) => log::error!("command error: {err}"),
        }
    }
    log::info!("stopping console...");
}

fn parse_command(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();
    let command = match cmd {
        "ad" => Command::AddDirectory(one_arg(cmd, &args)?),
        "aw" => Command::AddUrl(one_arg(cmd, &args)?),
        "get" => Command::Get(one_arg(cmd, &args)?),
        "query" => Command::Query(one_arg(cmd, &args)?),
        "links" => Command::Links(one_arg(cmd, &args)?),
        "cfs" => no_args(cmd, &args, Command::ClearFileSummary)?,
        "cws" => no_args(cmd, &args, Command::ClearWebSummary)?,
        "help" => no_args(cmd, &args, Command::Help)?,
        "stop" => no_args(cmd, &args, Command::Stop)?,
        other => bail!("command '{other}' was not recognized"),
    };
    Ok(command)
}

fn one_arg(cmd: &str, args: &[&str]) -> Result<String> {
    ensure!(
        args.len() == 1,
        "'{cmd}' takes 1 argument, but {} were passed",
        args.len()
    );
    Ok(args[0].to_string())
}

fn no_args(cmd: &str, args: &[&str], command: Command) -> Result<Command> {
    ensure!(args.is_empty(), "'{cmd}' does not take any arguments");
    Ok(command)
}

fn apply(engine: &Engine, command: Command) -> Result<()> {
    match command {
        Command::AddDirectory(path) => engine.add_directory(&path)?,
        Command::AddUrl(url) => {
            if engine.add_url(&url)? {
                log::info!("web scan submitted for {url}");
            } else {
                log::warn!("already visited url: {url}");
            }
        }
        Command::Get(raw) => run_query(engine, &raw, true)?,
        Command::Query(raw) => run_query(engine, &raw, false)?,
        Command::ClearFileSummary => engine.clear_summary(ScanType::File),
        Command::ClearWebSummary => engine.clear_summary(ScanType::Web),
        Command::Links(url) => {
            for link in engine.collect_links(&url)? {
                println!("{link}");
            }
        }
        Command::Help => print_help(),
        Command::Stop => {}
    }
    Ok(())
}

fn run_query(engine: &Engine, raw: &str, blocking: bool) -> Result<()> {
    match parse_query(raw)? {
        QueryTarget::Summary(scan_type) => {
            let summary = if blocking {
                engine.get_summary(scan_type)?
            } else {
                engine.query_summary(scan_type)?
            };
            print_summary(scan_type, &summary);
        }
        QueryTarget::Corpus { key, .. } => {
            let counts = if blocking {
                engine.get_result(&key)?
            } else {
                engine.query_result(&key)?
            };
            print_result(&key, &counts);
        }
    }
    Ok(())
}

fn print_result(title: &str, counts: &KeywordCounts) {
    let rendered: Vec<String> = counts.iter().map(|(k, v)| format!("{k}={v}")).collect();
    println!("{title:<25}: {}", rendered.join(", "));
}

fn print_summary(scan_type: ScanType, summary: &SummaryCounts) {
    println!("-- {scan_type} scan summary --");
    for (corpus, counts) in summary {
        print_result(corpus, counts);
    }
    println!("----------");
}

fn print_help() {
    println!("ad <path>              register a crawl root directory");
    println!("aw <url>               submit a web scan for a url");
    println!("get <type>|<id>        blocking result fetch ('<type>|summary' for summaries)");
    println!("query <type>|<id>      non-blocking result fetch");
    println!("links <url>            list the hyperlinks on a page");
    println!("cfs                    clear the memoized file summary");
    println!("cws                    clear the memoized web summary");
    println!("stop                   shut the engine down and exit");
}
