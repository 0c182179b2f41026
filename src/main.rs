
extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

pub mod compiler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use compiler::lexer::Lexer;
use compiler::lowering::Assembly;
use compiler::parser::Parser;

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tOutfile: {}\n\tInfile: {}",
        match args.occurrences_of("verbose") {
            0 => log::LevelFilter::Error.to_string(),
            1 => log::LevelFilter::Warn.to_string(),
            2 => log::LevelFilter::Info.to_string(),
            3 | _ => log::LevelFilter::Debug.to_string(),
        },
        args.value_of("output").unwrap_or("assembly.asm"),
        args.value_of("INPUT").unwrap_or("programa.lpn")
    );

    // Read the whole source file into memory before lexing begins.
    let ipath = Path::new(args.value_of("INPUT").unwrap_or("programa.lpn"));
    let source = match fs::read_to_string(&ipath) {
        Err(err) => {
            error!("fatal: unable to read source file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(text) => text,
    };

    // The trace of emitted instructions goes to stdout; diagnostics go
    // through the logger on stderr.
    let parser = Parser::new(Lexer::new(&source), std::io::stdout());

    let instructions = match parser.run() {
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
        Ok(list) => list,
    };

    if args.is_present("print-debug") {
        let mut grid = Grid::new(GridOptions {
            filling:     Filling::Spaces(1),
            direction:   Direction::LeftToRight,
        });

        for (idx, ins) in instructions.iter().enumerate() {
            grid.add(Cell::from(format!("0x{:04X}:", idx)));
            grid.add(Cell::from(format!("{}", ins)));
        }

        println!("{}", grid.fit_into_columns(2));
    }

    let assembly = match Assembly::lower(&instructions) {
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
        Ok(assembly) => assembly,
    };

    // The output file is only created once lowering has succeeded, so a
    // failed compilation never leaves a partial listing behind.
    let opath = Path::new(args.value_of("output").unwrap_or("assembly.asm"));
    let mut ofile = match File::create(&opath) {
        Err(err) => {
            error!("fatal: unable to open output file `{}`: {}", opath.display(), err);
            std::process::exit(1);
        },
        Ok(file) => file,
    };

    if let Err(err) = ofile.write_all(assembly.to_string().as_bytes()) {
        error!("fatal: unable to write to output file `{}`: {}", opath.display(), err);
        std::process::exit(1);
    }
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(option_env!("CARGO_PKG_NAME").unwrap_or("lpnc"))
        .version(option_env!("CARGO_PKG_VERSION").unwrap_or(""))
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap_or(""))
        .arg(Arg::with_name("INPUT")
            .help("Sets the source file to compile")
            .default_value("programa.lpn")
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .default_value("assembly.asm")
            .help("write the assembly listing to an outfile"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints the instruction list alongside the trace to STDOUT"))
        .get_matches()
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 | _ => log::LevelFilter::Debug,
        })
        .chain(std::io::stderr())
        .apply().ok();
}
