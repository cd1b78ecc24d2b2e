use std::time::{Duration, Instant};

use crate::dictionary::WordTable;
use crate::lexer::{Lexer, Token};

pub struct Pipeline<'a> {
    table: &'a WordTable,
}

#[derive(Debug, Default)]
pub struct CheckRun {
    pub misspelled: Vec<Token>,
    pub words: usize,
    /// Time spent inside [`WordTable::check`] only.
    pub check_time: Duration,
}

impl<'a> Pipeline<'a> {
    pub fn new(table: &'a WordTable) -> Pipeline<'a> {
        Pipeline { table }
    }

    pub fn run(&self, lexer: Lexer) -> CheckRun {
        lexer.fold(CheckRun::default(), |mut run, token| {
            run.words += 1;

            let start = Instant::now();
            let misspelled = !self.table.check(&token.lexeme);
            run.check_time += start.elapsed();

            if misspelled {
                run.misspelled.push(token);
            }
            run
        })
    }
}
