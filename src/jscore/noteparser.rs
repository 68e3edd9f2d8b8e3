use pest::iterators::Pair;
use pest_derive::Parser;

use crate::jscore::note::{Accidental, Note, NoteError, Stepname};

#[derive(Parser)]
#[grammar = "jscore/note.pest"]
pub struct NoteParser;

/// Builds a `Note` from a `Rule::NOTE` pair.
pub fn note_from_pair(pair: Pair<Rule>) -> Result<Note, NoteError> {
    if pair.as_rule() != Rule::NOTE {
        return Err(NoteError::Parse(format!("Unknown rule {:?}", pair.as_rule())));
    }
    let text = pair.as_str();
    let mut step = None;
    let mut accidental = Accidental::Natural;
    let mut octave = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::STEP => step = inner.as_str().chars().next().and_then(Stepname::from_char),
            Rule::ACCIDENTAL => accidental = match inner.as_str() {
                "#" => Accidental::Sharp,
                _ => Accidental::Flat,
            },
            Rule::OCTAVE => octave = Some(
                inner.as_str().parse::<i8>().map_err(|e| NoteError::Parse(format!("{}: {}", text, e)))?
            ),
            rule => return Err(NoteError::Parse(format!("Unknown rule {:?}", rule))),
        }
    }
    match (step, octave) {
        (Some(s), Some(o)) => Note::from_step(s, accidental, o),
        _ => Err(NoteError::Parse(format!("incomplete note {:?}", text))),
    }
}

/// Notes of a `Rule::CHORD` pair, in textual order.
pub fn notes_from_chord_pair(pair: Pair<Rule>) -> Result<Vec<Note>, NoteError> {
    pair.into_inner()
        .flat_map(|notes| notes.into_inner())
        .map(note_from_pair)
        .collect()
}
