//-
// Copyright (c) 2026, Jason Lingle
//
// This file is part of Mailtags.
//
// Mailtags is free software: you can  redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Mailtags is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without  even the implied  warranty of MERCHANTABILITY  or FITNESS
// FOR  A PARTICULAR  PURPOSE.  See the  GNU General  Public  License for  more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Mailtags. If not, see <http://www.gnu.org/licenses/>.

use std::path::PathBuf;

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use structopt::StructOpt;

use mailtags::prefs::TomlPrefs;
use mailtags::support::sysexits::*;
use mailtags::{Error, Tag, TagConfig, TagRegistry};

/// Inspect and edit the message tags kept in a preference file.
///
/// The preference file is created on the first change if it does not exist.
/// Opening it migrates any tags or labels stored in older schemes first.
#[derive(StructOpt)]
#[structopt(max_term_width = 80)]
struct Options {
    /// The preference file holding the tags.
    #[structopt(long, parse(from_os_str), default_value = "prefs.toml")]
    prefs: PathBuf,

    /// A TOML file configuring where tags and legacy labels are found.
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// A log4rs configuration file. Overrides --verbose.
    #[structopt(long, parse(from_os_str))]
    log_config: Option<PathBuf>,

    /// Log more to standard error. Can be given twice.
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    /// List all tags, most important first.
    ///
    /// Each line holds the key, text, colour, ordinal and style selector of a
    /// tag, separated by tabs.
    List,
    /// Define a tag, deriving its key from its text.
    ///
    /// If the text is already used by a tag, that tag is updated instead. The
    /// key is printed.
    Add(AddSubcommand),
    /// Define or redefine the tag with the given key.
    Set(SetSubcommand),
    /// Delete the tag with the given key.
    Delete {
        key: String,
    },
    /// Show the tag with the given key.
    Show {
        key: String,
    },
    /// Print the key of the tag with exactly the given text.
    KeyFor {
        text: String,
    },
    /// Print whichever of the given keys belongs to the most important tag.
    Top {
        keys: Vec<String>,
    },
    /// Print the style selector for the given key.
    Selector {
        key: String,
    },
    /// Retry a migration which failed when the file was opened.
    Migrate,
}

#[derive(StructOpt)]
struct AddSubcommand {
    /// The display colour, e.g. '#FF0000'.
    #[structopt(long, default_value = "")]
    color: String,

    /// The sort token; tags with smaller ordinals are more important.
    #[structopt(long, default_value = "")]
    ordinal: String,

    text: String,
}

#[derive(StructOpt)]
struct SetSubcommand {
    /// The display colour. Empty removes it.
    #[structopt(long, default_value = "")]
    color: String,

    /// The sort token. Empty removes it.
    #[structopt(long, default_value = "")]
    ordinal: String,

    key: String,
    text: String,
}

pub fn main() {
    // Clap exits with status 1 instead of EX_USAGE if we use the more concise
    // API
    let options = Options::from_clap(&match Options::clap().get_matches_safe()
    {
        Ok(matches) => matches,
        Err(
            e @ clap::Error {
                kind: clap::ErrorKind::HelpDisplayed,
                ..
            },
        )
        | Err(
            e @ clap::Error {
                kind: clap::ErrorKind::VersionDisplayed,
                ..
            },
        ) => {
            println!("{}", e.message);
            return;
        }
        Err(e) => {
            eprintln!("{}", e.message);
            EX_USAGE.exit()
        }
    });

    init_log(&options);

    let config = match options.config {
        None => TagConfig::default(),
        Some(ref path) => match TagConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Error in config file at '{}': {}",
                    path.display(),
                    e
                );
                EX_CONFIG.exit()
            }
        },
    };

    let mut registry = match TagRegistry::open(options.prefs.clone(), &config)
    {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("{}", e);
            exit_status(&e).exit()
        }
    };

    if let Err(e) = run(&mut registry, options.command) {
        eprintln!("{}", e);
        exit_status(&e).exit()
    }
}

fn init_log(options: &Options) {
    if let Some(ref path) = options.log_config {
        if let Err(e) =
            log4rs::init_file(path, log4rs::file::Deserializers::new())
        {
            eprintln!("Error in log config at '{}': {}", path.display(), e);
            EX_CONFIG.exit()
        }
        return;
    }

    let level = match options.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(
            "{d(%H:%M:%S%.3f)} [{l}][{t}] {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level));

    let result = match config {
        Ok(config) => log4rs::init_config(config)
            .map(|_| ())
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    if let Err(e) = result {
        eprintln!("Failed to initialise logging: {}", e);
        EX_SOFTWARE.exit()
    }
}

fn run(
    registry: &mut TagRegistry<TomlPrefs>,
    command: Command,
) -> Result<(), Error> {
    match command {
        Command::List => {
            for tag in registry.get_all_tags()? {
                print_tag(registry, &tag);
            }
        }

        Command::Add(cmd) => {
            let key = registry.add_tag(&cmd.text, &cmd.color, &cmd.ordinal)?;
            println!("{}", key);
        }

        Command::Set(cmd) => {
            registry.add_tag_for_key(
                &cmd.key,
                &cmd.text,
                &cmd.color,
                &cmd.ordinal,
            )?;
        }

        Command::Delete { key } => registry.delete_key(&key)?,

        Command::Show { key } => {
            let tag = Tag::new(
                key.to_ascii_lowercase(),
                registry.get_tag_for_key(&key)?,
                registry.get_color_for_key(&key)?,
                registry.get_ordinal_for_key(&key)?,
            );
            print_tag(registry, &tag);
        }

        Command::KeyFor { text } => {
            let key = registry.get_key_for_tag(&text)?;
            if key.is_empty() {
                return Err(Error::NotFound);
            }
            println!("{}", key);
        }

        Command::Top { keys } => {
            let top = registry.get_top_key(&keys.join(" "));
            if top.is_empty() {
                return Err(Error::NotFound);
            }
            println!("{}", top);
        }

        Command::Selector { key } => {
            println!("{}", registry.get_selector_for_key(&key));
        }

        Command::Migrate => registry.migrate()?,
    }

    Ok(())
}

fn print_tag(registry: &TagRegistry<TomlPrefs>, tag: &Tag) {
    println!(
        "{}\t{}\t{}\t{}\t{}",
        tag.key(),
        tag.text(),
        tag.color(),
        tag.ordinal(),
        registry.get_selector_for_key(tag.key()),
    );
}

fn exit_status(e: &Error) -> Sysexit {
    match *e {
        Error::NotFound
        | Error::WrongType
        | Error::MigrationIncomplete(_)
        | Error::TomlDe(_) => EX_DATAERR,
        Error::StoreUnavailable { .. } => EX_NOINPUT,
        Error::Io(_) | Error::TomlSer(_) => EX_IOERR,
        Error::OutOfMemory => EX_SOFTWARE,
    }
}
