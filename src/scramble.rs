use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

pub const DEFAULT_SCRAMBLE_LENGTH: usize = 20;

const FACES: [&str; 6] = ["R", "L", "U", "D", "F", "B"];
const SUFFIXES: [&str; 3] = ["", "'", "2"];

/// Supplies the scramble shown for the next attempt
pub trait ScrambleSource {
    fn next_scramble(&mut self) -> String;
}

/// Random face-turn scrambles; a face never repeats back to back
#[derive(Debug, Clone)]
pub struct RandomScrambler {
    rng: StdRng,
    length: usize,
}

impl RandomScrambler {
    pub fn new(length: usize) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            length,
        }
    }

    pub fn seeded(seed: u64, length: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            length,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomScrambler {
    fn default() -> Self {
        Self::new(DEFAULT_SCRAMBLE_LENGTH)
    }
}

impl ScrambleSource for RandomScrambler {
    fn next_scramble(&mut self) -> String {
        let mut last_face = "";
        let mut moves = Vec::with_capacity(self.length);

        for _ in 0..self.length {
            let face = loop {
                let face = *FACES.choose(&mut self.rng).unwrap_or(&"R");
                if face != last_face {
                    break face;
                }
            };
            last_face = face;
            let suffix = SUFFIXES.choose(&mut self.rng).unwrap_or(&"");
            moves.push(format!("{face}{suffix}"));
        }

        moves.iter().join(" ")
    }
}

/// Cycles through a fixed list; handy for scripted runs and tests
#[derive(Debug, Clone)]
pub struct ScriptedScrambles {
    scrambles: Vec<String>,
    next: usize,
}

impl ScriptedScrambles {
    pub fn new<I, T>(scrambles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            scrambles: scrambles.into_iter().map(Into::into).collect(),
            next: 0,
        }
    }
}

impl ScrambleSource for ScriptedScrambles {
    fn next_scramble(&mut self) -> String {
        if self.scrambles.is_empty() {
            return String::new();
        }
        let scramble = self.scrambles[self.next % self.scrambles.len()].clone();
        self.next += 1;
        scramble
    }
}
