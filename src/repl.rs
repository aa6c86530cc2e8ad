use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

use anyhow::{bail, Result};
use wanda_playground::{catalog::DEFAULT_EXAMPLE, Bridge, Selector};

const HELP: &str = r#"
  Lines you type are appended to the program.
  :run             run the program
  :show            print the program
  :clear           empty the program
  :list            list the examples
  :select LABEL    load an example into the program
  :quit            leave
"#;

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Run,
    Show,
    Clear,
    List,
    Select(&'a str),
    Help,
    Quit,
    Unknown(&'a str),
    Line(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let Some(command) = line.trim().strip_prefix(':') else {
            return Command::Line(line);
        };
        // A rule definition is `:` followed by whitespace; commands are not.
        if command.is_empty() || command.starts_with(char::is_whitespace) {
            return Command::Line(line);
        }
        let (name, argument) = command
            .split_once(char::is_whitespace)
            .unwrap_or((command, ""));
        match name {
            "run" => Command::Run,
            "show" => Command::Show,
            "clear" => Command::Clear,
            "list" => Command::List,
            "select" => Command::Select(argument.trim()),
            "help" => Command::Help,
            "quit" | "q" => Command::Quit,
            other => Command::Unknown(other),
        }
    }
}

pub fn start(bridge: &Bridge) -> Result<()> {
    let editor = Rc::new(RefCell::new(String::new()));

    let mut selector = Selector::new();
    let sink = editor.clone();
    selector.on_select(move |entry| *sink.borrow_mut() = entry.source.to_string());
    if !selector.select_by_label(DEFAULT_EXAMPLE) {
        bail!("default example {DEFAULT_EXAMPLE} is missing from the catalog");
    }

    println!("Wanda playground. :help lists the commands.");
    print!("{}", editor.borrow());

    loop {
        print!("wanda> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(());
        }
        let line = input.trim_end_matches(['\n', '\r']);

        match Command::parse(line) {
            Command::Run => match bridge.execute(&editor.borrow()) {
                Ok(output) => println!("{}", output),
                Err(err) => println!("error: {}", err),
            },
            Command::Show => print!("{}", editor.borrow()),
            Command::Clear => editor.borrow_mut().clear(),
            Command::List => {
                let current = selector.current().map(|entry| entry.label);
                for entry in selector.entries() {
                    let marker = if Some(entry.label) == current { "*" } else { " " };
                    println!("{} {}", marker, entry.label);
                }
            }
            Command::Select(label) => {
                if selector.select_by_label(label) {
                    print!("{}", editor.borrow());
                } else {
                    println!("no example named {}", label);
                }
            }
            Command::Help => print!("{}", HELP),
            Command::Quit => return Ok(()),
            Command::Unknown(command) => println!("unknown command :{}", command),
            Command::Line(text) => {
                let mut editor = editor.borrow_mut();
                editor.push_str(text);
                editor.push('\n');
            }
        }
    }
}
