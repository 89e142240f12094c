use std::collections::VecDeque;
use std::io;

/// Capability for asking the user questions during resolution.
///
/// Implementations own the terminal mechanics, including re-prompting
/// until the answer is syntactically valid; callers only ever see a
/// well-formed response.
pub trait Ask {
    /// Present a header and a numbered list of options, and return the
    /// index of the option the user picked. The returned index is
    /// guaranteed to be in `0..options.len()`.
    fn select(&mut self, header: &str, options: &[String]) -> io::Result<usize>;

    /// Ask for a free-form line of input.
    fn input(&mut self, description: &str) -> io::Result<String>;
}

/// Scripted responses, for driving a resolution without a terminal.
/// Used by tests throughout the workspace.
#[derive(Debug, Default)]
pub struct Scripted {
    selections: VecDeque<usize>,
    lines: VecDeque<String>,
}

impl Scripted {
    pub fn new<S, L>(selections: S, lines: L) -> Self
    where
        S: IntoIterator<Item = usize>,
        L: IntoIterator<Item = String>,
    {
        Self {
            selections: selections.into_iter().collect(),
            lines: lines.into_iter().collect(),
        }
    }

    pub fn selections<S: IntoIterator<Item = usize>>(selections: S) -> Self {
        Self::new(selections, [])
    }

    pub fn push_selection(&mut self, selection: usize) {
        self.selections.push_back(selection);
    }

    pub fn push_line(&mut self, line: &str) {
        self.lines.push_back(line.to_owned());
    }

    /// True once every scripted response has been consumed.
    pub fn is_drained(&self) -> bool {
        self.selections.is_empty() && self.lines.is_empty()
    }
}

impl Ask for Scripted {
    fn select(&mut self, header: &str, options: &[String]) -> io::Result<usize> {
        let pick = self.selections.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted selection left for {header:?}"),
            )
        })?;
        assert!(
            pick < options.len(),
            "scripted selection {pick} out of range for {header:?} ({} options)",
            options.len()
        );
        Ok(pick)
    }

    fn input(&mut self, description: &str) -> io::Result<String> {
        self.lines.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted line left for {description:?}"),
            )
        })
    }
}
