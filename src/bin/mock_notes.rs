#![forbid(unsafe_code)]

//! Minimal note-taking binary implementing the invocation contract the
//! harness expects: `-p NAME` selects a profile, `-f PATH` the storage
//! folder, subcommands mutate or print the profile. It backs the shipped
//! suite documents and the harness's own integration tests, so a harness
//! build can be smoke-tested without the real tool.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use notecheck::codec;
use notecheck::constants::DATE_FORMAT;
use notecheck::models::{Note, Profile};

fn main() -> Result<()> {
    let matches = Command::new("mock_notes")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reference note-taking binary for harness self-tests")
        .arg(
            Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("NAME")
                .help("Profile to operate on")
                .default_value("default"),
        )
        .arg(
            Arg::new("folder")
                .short('f')
                .long("folder")
                .value_name("PATH")
                .help("Profile storage folder")
                .required(true),
        )
        .arg(
            Arg::new("key")
                .short('k')
                .long("key")
                .value_name("PASSPHRASE")
                .help("Passphrase for an encrypted profile")
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("new-profile").about("Create an empty profile").arg(
                Arg::new("encrypted")
                    .long("encrypted")
                    .help("Encrypt the profile with the passphrase from -k")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            Command::new("add")
                .about("Append a note")
                .arg(Arg::new("title").value_name("TITLE").required(true))
                .arg(
                    Arg::new("started")
                        .long("started")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("urgent"),
                )
                .arg(Arg::new("urgent").long("urgent").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("body")
                        .short('b')
                        .long("body")
                        .value_name("TEXT")
                        .conflicts_with("stdin-body"),
                )
                .arg(
                    Arg::new("stdin-body")
                        .long("stdin-body")
                        .help("Read the note body from standard input")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("del")
                .about("Delete a note by id")
                .arg(Arg::new("id").value_name("ID").required(true)),
        )
        .subcommand(
            Command::new("view")
                .about("Print a single note")
                .arg(Arg::new("id").value_name("ID").required(true))
                .arg(json_flag()),
        )
        .subcommand(Command::new("list").about("Print all notes").arg(json_flag()))
        .subcommand(
            Command::new("search")
                .about("Print notes whose title contains a pattern")
                .arg(Arg::new("pattern").value_name("PATTERN").required(true))
                .arg(json_flag()),
        )
        .get_matches();

    let store = Store::from_matches(&matches)?;
    match matches.subcommand() {
        Some(("new-profile", sub)) => cmd_new_profile(&store, sub),
        Some(("add", sub)) => cmd_add(&store, sub),
        Some(("del", sub)) => cmd_del(&store, sub),
        Some(("view", sub)) => cmd_view(&store, sub),
        Some(("list", sub)) => cmd_list(&store, sub),
        Some(("search", sub)) => cmd_search(&store, sub),
        _ => bail!("no command given"),
    }
}

fn json_flag() -> Arg {
    Arg::new("json")
        .short('j')
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}

/// Where one profile lives on disk and how it is keyed.
struct Store {
    path: PathBuf,
    key: Option<String>,
}

impl Store {
    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let folder = matches
            .get_one::<String>("folder")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("--folder is required"))?;
        fs::create_dir_all(&folder)
            .with_context(|| format!("could not create profile folder {}", folder.display()))?;

        let profile = matches
            .get_one::<String>("profile")
            .cloned()
            .unwrap_or_else(|| "default".to_string());
        Ok(Store {
            path: folder.join(format!("{profile}.json")),
            key: matches.get_one::<String>("key").cloned(),
        })
    }

    fn load(&self) -> Result<Profile> {
        let bytes = fs::read(&self.path)
            .with_context(|| format!("no profile at {}", self.path.display()))?;
        let profile = match self.key.as_deref() {
            Some(key) => codec::decode(&bytes, true, Some(key))?,
            None => codec::decode(&bytes, false, None)?,
        };
        Ok(profile)
    }

    fn save(&self, profile: &Profile) -> Result<()> {
        let text = serde_json::to_string_pretty(profile)?;
        let bytes = match &self.key {
            Some(key) => codec::encrypt(text.as_bytes(), key),
            None => text.into_bytes(),
        };
        fs::write(&self.path, bytes)
            .with_context(|| format!("could not write profile {}", self.path.display()))
    }
}

fn cmd_new_profile(store: &Store, sub: &ArgMatches) -> Result<()> {
    let encrypted = sub.get_flag("encrypted");
    if encrypted && store.key.is_none() {
        bail!("--encrypted requires a passphrase (-k)");
    }
    store.save(&Profile {
        encrypted,
        notes: Vec::new(),
    })
}

fn cmd_add(store: &Store, sub: &ArgMatches) -> Result<()> {
    let mut profile = store.load()?;

    let title = sub
        .get_one::<String>("title")
        .cloned()
        .ok_or_else(|| anyhow!("a title is required"))?;
    let status = if sub.get_flag("started") {
        "Started"
    } else if sub.get_flag("urgent") {
        "Urgent"
    } else {
        ""
    };
    let body = if sub.get_flag("stdin-body") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("could not read note body from stdin")?;
        text
    } else {
        sub.get_one::<String>("body").cloned().unwrap_or_default()
    };

    let id = profile.notes.iter().map(|note| note.id).max().unwrap_or(0) + 1;
    profile.notes.push(Note {
        id,
        title,
        status: status.to_string(),
        body,
        last_touched: chrono::Local::now().format(DATE_FORMAT).to_string(),
    });
    store.save(&profile)
}

fn cmd_del(store: &Store, sub: &ArgMatches) -> Result<()> {
    let mut profile = store.load()?;
    let id = parse_id(sub)?;
    let index = profile
        .notes
        .iter()
        .position(|note| note.id == id)
        .ok_or_else(|| anyhow!("no note with id {id}"))?;
    profile.notes.remove(index);
    store.save(&profile)
}

fn cmd_view(store: &Store, sub: &ArgMatches) -> Result<()> {
    let profile = store.load()?;
    let id = parse_id(sub)?;
    let note = profile
        .notes
        .iter()
        .find(|note| note.id == id)
        .ok_or_else(|| anyhow!("no note with id {id}"))?;
    if sub.get_flag("json") {
        println!("{}", serde_json::to_string(note)?);
    } else {
        print_note_line(note);
        if !note.body.is_empty() {
            println!("{}", note.body);
        }
    }
    Ok(())
}

fn cmd_list(store: &Store, sub: &ArgMatches) -> Result<()> {
    let profile = store.load()?;
    if sub.get_flag("json") {
        println!("{}", serde_json::to_string(&profile.notes)?);
    } else {
        for note in &profile.notes {
            print_note_line(note);
        }
    }
    Ok(())
}

fn cmd_search(store: &Store, sub: &ArgMatches) -> Result<()> {
    let profile = store.load()?;
    let pattern = sub
        .get_one::<String>("pattern")
        .cloned()
        .ok_or_else(|| anyhow!("a pattern is required"))?;
    let matches: Vec<&Note> = profile
        .notes
        .iter()
        .filter(|note| note.title.contains(&pattern))
        .collect();
    if sub.get_flag("json") {
        println!("{}", serde_json::to_string(&matches)?);
    } else {
        for note in matches {
            print_note_line(note);
        }
    }
    Ok(())
}

fn parse_id(sub: &ArgMatches) -> Result<i64> {
    let raw = sub
        .get_one::<String>("id")
        .ok_or_else(|| anyhow!("an id is required"))?;
    raw.parse::<i64>()
        .map_err(|_| anyhow!("invalid note id '{raw}'"))
}

fn print_note_line(note: &Note) {
    if note.status.is_empty() {
        println!("{}: {}", note.id, note.title);
    } else {
        println!("{}: {} [{}]", note.id, note.title, note.status);
    }
}
