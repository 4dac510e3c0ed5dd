//! album-chat: terminal front-end for the Gojira album Q&A backend.
//! Reads config, sends queries over HTTP, prints answers with routing
//! metadata and a recent-queries list. One query in flight at a time.

use album_chat_client::{config, QueryClient, QueryResponse, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

fn resolve_config_path(args: &[String]) -> PathBuf {
    // 1. --config <path> flag
    if let Some(pos) = args.iter().position(|a| a == "--config") {
        if let Some(path) = args.get(pos + 1) {
            return PathBuf::from(path);
        }
    }
    // 2. ALBUM_CHAT_CONFIG env var
    if let Ok(val) = std::env::var("ALBUM_CHAT_CONFIG") {
        return PathBuf::from(val);
    }
    // 3. Default path (~/.album-chat/config.yaml)
    config::default_config_path().unwrap_or_else(|| {
        eprintln!("Error: unable to determine config path (set --config or ALBUM_CHAT_CONFIG)");
        process::exit(1);
    })
}

/// Positional args after stripping the flags we understand.
fn question_from_args(args: &[String]) -> Option<String> {
    let mut words = Vec::new();
    let mut skip = false;
    for arg in &args[1..] {
        if skip {
            skip = false;
            continue;
        }
        match arg.as_str() {
            "--config" => skip = true,
            "--health" => {}
            other => words.push(other.to_string()),
        }
    }
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn print_answer(out: &mut impl Write, response: &QueryResponse) {
    if let Some(routing) = &response.routing {
        let mut badges = vec![routing.query_type.clone()];
        if !routing.sections.is_empty() {
            badges.push(routing.sections.join(", "));
        }
        badges.push(format!("{}% confidence", routing.confidence_percent()));
        let _ = writeln!(out, "[{}]", badges.join(" | "));
    }
    let _ = writeln!(out, "Q: {}", response.query);
    let _ = writeln!(out, "{}", response.answer);
}

fn print_recent(out: &mut impl Write, session: &Session) {
    let recent = session.recent_queries();
    if recent.is_empty() {
        return;
    }
    let _ = writeln!(out, "\nRecent queries:");
    for (i, q) in recent.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, q);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let config_path = resolve_config_path(&args);

    // Missing config file means defaults; a malformed one is a startup error.
    let cfg = if config_path.exists() {
        match config::load(&config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!(
                    "Error: failed to load config from {}: {}",
                    config_path.display(),
                    e
                );
                process::exit(1);
            }
        }
    } else {
        config::Config::default()
    };

    let base_url = config::resolve_base_url(&cfg);
    let result_limit = cfg.result_limit();
    let client = QueryClient::new(&base_url);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    if args.iter().any(|a| a == "--health") {
        rt.block_on(async {
            match client.check_health().await {
                Ok(body) => println!("{}", body),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            }
        });
        return;
    }

    let mut session = Session::new();

    // One-shot mode: question from positional arguments.
    if let Some(question) = question_from_args(&args) {
        rt.block_on(async {
            session.submit(&client, &question, result_limit).await;
        });
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match session.answer() {
            Some(response) => print_answer(&mut out, response),
            None => {
                eprintln!("Error: {}", session.error().unwrap_or("query failed"));
                process::exit(1);
            }
        }
        return;
    }

    // Interactive mode: each non-blank stdin line is a query; `!N` re-submits
    // the Nth recent query. The loop settles one query before reading the
    // next line, so at most one request is ever in flight.
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let question = if let Some(n) = text.strip_prefix('!') {
            match n.trim().parse::<usize>().ok().and_then(|n| {
                session.recent_entry(n).map(str::to_string)
            }) {
                Some(q) => q,
                None => {
                    eprintln!("Error: no recent query {}", n.trim());
                    continue;
                }
            }
        } else {
            text.to_string()
        };

        rt.block_on(async {
            session.submit(&client, &question, result_limit).await;
        });

        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Some(response) = session.answer() {
            print_answer(&mut out, response);
            print_recent(&mut out, &session);
            let _ = writeln!(out);
        } else if let Some(error) = session.error() {
            eprintln!("Error: {}", error);
        }
        let _ = out.flush();
    }
}
