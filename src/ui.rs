use std::cell::RefCell;
use std::io;

use colored::Colorize;

use resolve::Ask;

/// All interactions with the text UI should go through this struct.
pub struct Ui {
    /// buffer to hold strings internally when getting input
    strbuf: RefCell<String>,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            // Refcell so reads don't need a unique reference:
            strbuf: RefCell::new(String::with_capacity(64)),
        }
    }

    fn read_line(&self) -> io::Result<String> {
        let mut strbuf = self.strbuf.borrow_mut();
        strbuf.clear();
        io::stdin().read_line(&mut strbuf)?;
        Ok(strbuf.trim().to_owned())
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new()
    }
}

impl Ask for Ui {
    /// Print the menu and read selections until one parses as an integer
    /// in the valid index set. No limit on retries.
    fn select(&mut self, header: &str, options: &[String]) -> io::Result<usize> {
        loop {
            eprintln!("\n{header}");
            for (i, label) in options.iter().enumerate() {
                eprintln!("{i}) {label}");
            }
            let line = self.read_line()?;
            match line.parse::<usize>() {
                Ok(n) if n < options.len() => return Ok(n),
                _ => eprintln!("{}: invalid selection \"{line}\"", "ERROR".red()),
            }
        }
    }

    fn input(&mut self, description: &str) -> io::Result<String> {
        eprintln!("{}:", description.cyan());
        self.read_line()
    }
}
