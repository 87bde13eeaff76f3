//! toyhash_collide - find two inputs with the same ToyHash
//!
//! Runs one of the collision strategies from `toyhash::hashing::collision` and prints the pair.

use std::error::Error as StdError;
use std::io::{self, Write};

use clap::{Parser, Subcommand};
use log::info;
use toyhash::hashing::collision::{
    avalanche, single_byte_sensitivity, Collision, CollisionSearch, ALPHANUMERIC,
    NEIGHBOUR_BASES,
};
use toyhash::{toy_hash, Error};

/// ToyHash collision finder
#[derive(Parser, Debug)]
#[command(name = "toyhash_collide")]
#[command(version)]
#[command(about = "Search for two distinct inputs with the same ToyHash")]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Bytes to build candidate strings from
    #[arg(short, long, global = true)]
    alphabet: Option<String>,

    /// Maximum number of candidates to hash
    #[arg(short = 'n', long, global = true)]
    max_attempts: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Enumerate every string over the alphabet, shortest first
    Brute {
        /// Shortest candidate length
        #[arg(long, default_value = "1")]
        min_len: usize,

        /// Longest candidate length
        #[arg(long, default_value = "4")]
        max_len: usize,
    },

    /// Hash random strings until two collide
    Birthday {
        /// Shortest candidate length
        #[arg(long, default_value = "3")]
        min_len: usize,

        /// Longest candidate length
        #[arg(long, default_value = "6")]
        max_len: usize,

        /// RNG seed (random if omitted)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Try every printable string of one and two bytes
    Pairs,

    /// Insert one printable byte into a few base strings
    Neighbours,

    /// Neighbour strings, then random strings, against one table
    Advanced {
        /// Longest random candidate length
        #[arg(long, default_value = "5")]
        max_len: usize,

        /// RNG seed for the random phase
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Analyze, then try pairs, advanced, brute and birthday in turn until one hits
    All {
        /// RNG seed for the random strategies (random if omitted)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Print sample hashes and how a one-byte change moves them
    Analyze {
        /// Base string for the avalanche table
        #[arg(default_value = "hello")]
        base: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn StdError>> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut search = CollisionSearch::new().alphabet(
        args.alphabet
            .as_deref()
            .map(str::as_bytes)
            .unwrap_or(ALPHANUMERIC),
    );
    if let Some(n) = args.max_attempts {
        search = search.max_attempts(n);
    }

    let found = match &args.mode {
        Mode::Brute { min_len, max_len } => search
            .min_len(*min_len)
            .max_len(*max_len)
            .max_attempts(args.max_attempts.unwrap_or(u64::MAX))
            .brute_force()?,
        Mode::Birthday {
            min_len,
            max_len,
            seed,
        } => search
            .min_len(*min_len)
            .max_len(*max_len)
            .seed(*seed)
            .birthday()?,
        Mode::Pairs => search.short_bytes_search()?,
        Mode::Neighbours => search.neighbour_search(&NEIGHBOUR_BASES)?,
        Mode::Advanced { max_len, seed } => search
            .max_len(*max_len)
            .seed(Some(*seed))
            .advanced(&NEIGHBOUR_BASES)?,
        Mode::All { seed } => {
            analyze(&mut out, b"hello")?;
            run_all(&mut out, search.seed(*seed))?
        }
        Mode::Analyze { base } => {
            analyze(&mut out, base.as_bytes())?;
            return Ok(out.flush()?);
        }
    };

    report(&mut out, &found)?;
    Ok(out.flush()?)
}

const ALL_STEPS: [&str; 4] = ["pairs", "advanced", "brute", "birthday"];

/// Tries each strategy in turn and returns the first collision.
///
/// A strategy that comes back empty moves on to the next; any other error stops the run.
fn run_all<W: Write>(out: &mut W, search: CollisionSearch) -> Result<Collision, Box<dyn StdError>> {
    let mut last = Error::NotFound { attempts: 0 };
    for name in ALL_STEPS {
        writeln!(out, "\n=== Trying {} ===", name)?;
        let search = search.clone();
        let result = match name {
            "pairs" => search.short_bytes_search(),
            "advanced" => search.max_len(5).advanced(&NEIGHBOUR_BASES),
            "brute" => search
                .min_len(1)
                .max_len(4)
                .max_attempts(u64::MAX)
                .brute_force(),
            _ => search.max_len(6).max_attempts(200_000).birthday(),
        };
        match result {
            Ok(found) => return Ok(found),
            Err(e @ Error::NotFound { .. }) => {
                info!("{} found nothing", name);
                writeln!(out, "  {}", e)?;
                last = e;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(last.into())
}

fn report<W: Write>(out: &mut W, found: &Collision) -> io::Result<()> {
    writeln!(out, "Collision found after {} attempts", found.attempts)?;
    writeln!(out, "  Hash:     0x{:08x}", found.hash)?;
    writeln!(out, "  String 1: \"{}\"", found.first.escape_ascii())?;
    writeln!(out, "  String 2: \"{}\"", found.second.escape_ascii())?;

    if found.is_valid() {
        writeln!(
            out,
            "Verified: both inputs hash to 0x{:08x}",
            toy_hash(&found.first)
        )
    } else {
        writeln!(out, "Verification FAILED")
    }
}

fn analyze<W: Write>(out: &mut W, base: &[u8]) -> io::Result<()> {
    let samples: [&[u8]; 10] = [
        b"a", b"b", b"ab", b"ba", b"abc", b"cba", b"hello", b"world", b"test", b"1234",
    ];

    writeln!(out, "=== Sample hashes ===")?;
    for s in samples {
        writeln!(out, "  \"{}\" -> 0x{:08x}", s.escape_ascii(), toy_hash(s))?;
    }

    writeln!(out, "\n=== Appending one byte to \"{}\" ===", base.escape_ascii())?;
    writeln!(out, "  \"{}\" -> 0x{:08x}", base.escape_ascii(), toy_hash(base))?;
    // 'a' through 'y'
    for row in avalanche(base, b'a'..b'z') {
        writeln!(
            out,
            "  \"{}\" -> 0x{:08x} (diff: 0x{:08x}, {} bits)",
            row.input.escape_ascii(),
            row.hash,
            row.diff,
            row.diff.count_ones()
        )?;
    }

    let sensitivity = single_byte_sensitivity(base);
    writeln!(
        out,
        "\n=== Single-byte substitutions ===\n  {}/{} changed the hash",
        sensitivity.changed, sensitivity.mutations
    )
}
