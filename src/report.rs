use std::fmt::{self, Display};
use std::time::Duration;

use serde::Serialize;

use crate::lexer::Token;

#[derive(Debug, Serialize, PartialEq)]
pub struct Misspelling {
    pub word: String,
    pub line: u32,
    pub column: u32,
}

impl From<Token> for Misspelling {
    fn from(token: Token) -> Self {
        Misspelling {
            line: token.start.line(),
            column: token.start.column(),
            word: token.lexeme,
        }
    }
}

/// Seconds spent in each table operation.
#[derive(Debug, Default, Serialize, Clone, Copy)]
pub struct Timings {
    pub load: f64,
    pub check: f64,
    pub size: f64,
    pub unload: f64,
}

impl Timings {
    pub fn new(load: Duration, check: Duration, size: Duration, unload: Duration) -> Self {
        Timings {
            load: load.as_secs_f64(),
            check: check.as_secs_f64(),
            size: size.as_secs_f64(),
            unload: unload.as_secs_f64(),
        }
    }

    pub fn total(&self) -> f64 {
        self.load + self.check + self.size + self.unload
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub misspellings: Vec<Misspelling>,
    pub words_misspelled: usize,
    pub words_in_dictionary: usize,
    pub words_in_text: usize,
    pub timings: Timings,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nMISSPELLED WORDS\n")?;
        for m in &self.misspellings {
            writeln!(f, "{}", m.word)?;
        }
        writeln!(f)?;
        writeln!(f, "WORDS MISSPELLED:     {}", self.words_misspelled)?;
        writeln!(f, "WORDS IN DICTIONARY:  {}", self.words_in_dictionary)?;
        writeln!(f, "WORDS IN TEXT:        {}", self.words_in_text)?;
        writeln!(f, "TIME IN load:         {:.2}", self.timings.load)?;
        writeln!(f, "TIME IN check:        {:.2}", self.timings.check)?;
        writeln!(f, "TIME IN size:         {:.2}", self.timings.size)?;
        writeln!(f, "TIME IN unload:       {:.2}", self.timings.unload)?;
        writeln!(f, "TIME IN TOTAL:        {:.2}\n", self.timings.total())
    }
}
