//! Ordered rule pipeline over whitespace tokens.
//!
//! A pipeline is a flat list of [`Step`]s interpreted in order against one
//! [`QueryState`]. Match steps consume tokens and set the capture set;
//! the steps after them turn captures into remembered values or finished
//! output parts. Step order is the grammar: a token consumed by an early
//! rule is invisible to every later one, so the catch-all free-text rule
//! always runs last.

use regex::Regex;

/// One unit of pipeline work.
pub enum Step {
    /// Test every remaining token against an anchored pattern. Matching
    /// tokens are consumed; their captured values (first capture group,
    /// or the whole token) replace the current capture set.
    Match(&'static Regex),
    /// Move all captures into memory.
    RememberAll,
    /// Push one constant into memory, provided anything was captured.
    RememberConst(&'static str),
    /// Map each capture to zero or more strings and push those into
    /// memory.
    RememberMap(fn(&str) -> Vec<String>),
    /// Append a constant output part, provided anything was captured.
    Emit(&'static str),
    /// Drop the captures without producing output.
    Discard,
    /// Collapse memory into one output part.
    Aggregate(fn(&[String]) -> String),
    /// Append a fallback part unless some step since the previous
    /// `OrDefault` already produced output; closes the rule group either
    /// way.
    OrDefault(String),
}

/// Split raw query text into whitespace-separated tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// State threaded through the steps of one compile call.
#[derive(Debug, Default)]
pub struct QueryState {
    tokens: Vec<String>,
    parts: Vec<String>,
    captures: Vec<String>,
    memory: Vec<String>,
    had_match: bool,
}

impl QueryState {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, step: &Step) {
        match step {
            Step::Match(pattern) => self.match_tokens(pattern),
            Step::RememberAll => self.remember_all(),
            Step::RememberConst(value) => self.remember_const(value),
            Step::RememberMap(f) => self.remember_map(*f),
            Step::Emit(part) => self.emit(part),
            Step::Discard => self.discard(),
            Step::Aggregate(f) => self.aggregate(*f),
            Step::OrDefault(part) => self.or_default(part),
        }
    }

    /// Consume every token matching `pattern`. The captured values, in
    /// token order and deduplicated by first occurrence, become the new
    /// capture set; a step that matches nothing leaves it empty.
    fn match_tokens(&mut self, pattern: &Regex) {
        let mut captures: Vec<String> = Vec::new();
        let mut remaining = Vec::with_capacity(self.tokens.len());
        for token in self.tokens.drain(..) {
            let captured = pattern.captures(&token).map(|groups| match groups.get(1) {
                Some(group) => group.as_str().to_string(),
                None => token.clone(),
            });
            match captured {
                Some(value) => {
                    if !captures.contains(&value) {
                        captures.push(value);
                    }
                }
                None => remaining.push(token),
            }
        }
        self.tokens = remaining;
        self.captures = captures;
    }

    fn remember_all(&mut self) {
        let captured = std::mem::take(&mut self.captures);
        for value in captured {
            if !self.memory.contains(&value) {
                self.memory.push(value);
            }
        }
    }

    fn remember_const(&mut self, value: &str) {
        if self.captures.is_empty() {
            return;
        }
        self.captures.clear();
        if !self.memory.iter().any(|m| m == value) {
            self.memory.push(value.to_string());
        }
    }

    fn remember_map(&mut self, f: fn(&str) -> Vec<String>) {
        if self.captures.is_empty() {
            return;
        }
        let captured = std::mem::take(&mut self.captures);
        for value in &captured {
            for mapped in f(value) {
                if !self.memory.contains(&mapped) {
                    self.memory.push(mapped);
                }
            }
        }
    }

    fn emit(&mut self, part: &str) {
        if self.captures.is_empty() {
            return;
        }
        self.captures.clear();
        self.parts.push(part.to_string());
        self.had_match = true;
    }

    fn discard(&mut self) {
        if self.captures.is_empty() {
            return;
        }
        self.captures.clear();
        self.had_match = true;
    }

    /// Collapse memory into one part. With an empty memory nothing is
    /// appended and the match flag stays put, but the capture set is
    /// still cleared so the next rule starts clean.
    fn aggregate(&mut self, f: fn(&[String]) -> String) {
        self.captures.clear();
        if self.memory.is_empty() {
            return;
        }
        let memory = std::mem::take(&mut self.memory);
        self.parts.push(f(&memory));
        self.had_match = true;
    }

    fn or_default(&mut self, part: &str) {
        if !self.had_match {
            self.parts.push(part.to_string());
        }
        self.had_match = false;
    }

    /// Join the non-blank output parts with `separator` and append
    /// `suffix` unconditionally.
    pub fn into_output(self, separator: &str, suffix: &str) -> String {
        let parts: Vec<String> = self
            .parts
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();
        format!("{}{}", parts.join(separator), suffix)
    }
}

/// A complete pipeline: ordered steps plus join syntax for the output.
pub struct Pipeline {
    steps: Vec<Step>,
    separator: &'static str,
    suffix: &'static str,
}

impl Pipeline {
    pub fn new(steps: Vec<Step>, separator: &'static str, suffix: &'static str) -> Self {
        Self {
            steps,
            separator,
            suffix,
        }
    }

    /// Run the pipeline over `text` and return the joined output.
    pub fn run(&self, text: &str) -> String {
        let mut state = QueryState::new(tokenize(text));
        for step in &self.steps {
            state.apply(step);
        }
        state.into_output(self.separator, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref WORD_AB: Regex = Regex::new("^ab$").unwrap();
        static ref DIGITS: Regex = Regex::new(r"^(\d+)x$").unwrap();
        static ref LETTERS_A: Regex = Regex::new("^a+$").unwrap();
        static ref CATCH_ALL: Regex = Regex::new("^.*$").unwrap();
    }

    fn join_comma(memory: &[String]) -> String {
        memory.join(",")
    }

    #[test]
    fn tokenize_splits_on_any_whitespace() {
        assert_eq!(tokenize("a  b\tc\nd"), vec!["a", "b", "c", "d"]);
        assert_eq!(tokenize("   "), Vec::<String>::new());
        assert_eq!(tokenize(""), Vec::<String>::new());
    }

    #[test]
    fn consumed_tokens_are_invisible_to_later_rules() {
        let pipeline = Pipeline::new(
            vec![
                Step::Match(&WORD_AB),
                Step::Discard,
                Step::Match(&CATCH_ALL),
                Step::RememberAll,
                Step::Aggregate(join_comma),
            ],
            " ",
            "",
        );
        assert_eq!(pipeline.run("ab cd"), "cd");
    }

    #[test]
    fn capture_group_wins_over_whole_token() {
        let pipeline = Pipeline::new(
            vec![
                Step::Match(&DIGITS),
                Step::RememberAll,
                Step::Aggregate(join_comma),
            ],
            " ",
            "",
        );
        assert_eq!(pipeline.run("12x 9x"), "12,9");
    }

    #[test]
    fn duplicate_captures_keep_first_occurrence() {
        let pipeline = Pipeline::new(
            vec![
                Step::Match(&DIGITS),
                Step::RememberAll,
                Step::Aggregate(join_comma),
            ],
            " ",
            "",
        );
        assert_eq!(pipeline.run("12x 9x 12x"), "12,9");
    }

    #[test]
    fn unmatched_rule_replaces_stale_captures() {
        // ab is captured by the first rule, but the second rule matches
        // nothing and must wipe the capture set, so the emit stays quiet.
        let pipeline = Pipeline::new(
            vec![
                Step::Match(&WORD_AB),
                Step::Match(&DIGITS),
                Step::Emit("digits"),
            ],
            " ",
            "",
        );
        assert_eq!(pipeline.run("ab"), "");
    }

    #[test]
    fn remember_const_records_once() {
        let pipeline = Pipeline::new(
            vec![
                Step::Match(&LETTERS_A),
                Step::RememberConst("seen"),
                Step::Aggregate(join_comma),
            ],
            " ",
            "",
        );
        assert_eq!(pipeline.run("a aa aaa"), "seen");
    }

    #[test]
    fn remember_const_skips_without_captures() {
        let pipeline = Pipeline::new(
            vec![
                Step::Match(&DIGITS),
                Step::RememberConst("seen"),
                Step::Aggregate(join_comma),
            ],
            " ",
            "",
        );
        assert_eq!(pipeline.run("ab"), "");
    }

    #[test]
    fn aggregate_with_empty_memory_still_clears_captures() {
        // The first aggregate has nothing remembered, so it emits no part,
        // but it must still drop the captures; otherwise the remember that
        // follows would feed them into the second aggregate.
        let pipeline = Pipeline::new(
            vec![
                Step::Match(&CATCH_ALL),
                Step::Aggregate(join_comma),
                Step::RememberAll,
                Step::Aggregate(join_comma),
            ],
            " ",
            "",
        );
        assert_eq!(pipeline.run("ab cd"), "");
    }

    #[test]
    fn emit_requires_captures() {
        let pipeline = Pipeline::new(
            vec![Step::Match(&WORD_AB), Step::Emit("hit")],
            " ",
            "",
        );
        assert_eq!(pipeline.run("ab"), "hit");
        assert_eq!(pipeline.run("zz"), "");
    }

    #[test]
    fn default_fires_only_when_rule_group_missed() {
        let matched = Pipeline::new(
            vec![
                Step::Match(&WORD_AB),
                Step::Discard,
                Step::OrDefault("fallback".to_string()),
            ],
            " ",
            "",
        );
        assert_eq!(matched.run("ab"), "");
        assert_eq!(matched.run("zz"), "fallback");
    }

    #[test]
    fn default_resets_the_match_flag() {
        // The first group matches and suppresses its default, which must
        // not leak into the second group's default.
        let pipeline = Pipeline::new(
            vec![
                Step::Match(&WORD_AB),
                Step::Discard,
                Step::OrDefault("first".to_string()),
                Step::Match(&DIGITS),
                Step::Discard,
                Step::OrDefault("second".to_string()),
            ],
            " ",
            "",
        );
        assert_eq!(pipeline.run("ab"), "second");
    }

    #[test]
    fn blank_parts_are_dropped_before_joining() {
        let pipeline = Pipeline::new(
            vec![
                Step::OrDefault(String::new()),
                Step::Match(&CATCH_ALL),
                Step::RememberAll,
                Step::Aggregate(join_comma),
            ],
            " AND ",
            "",
        );
        assert_eq!(pipeline.run("ab"), "ab");
    }

    #[test]
    fn suffix_is_appended_even_without_parts() {
        let pipeline = Pipeline::new(vec![], " ", " tail");
        assert_eq!(pipeline.run(""), " tail");
    }
}
