//! Prompt catalog: the prompt template and output schema for each puzzle kind.

use serde_json::{Value, json};

use crate::models::{GameType, PuzzleRequest};

pub const RESPONSE_MIME_TYPE: &str = "application/json";
pub const TEMPERATURE: f64 = 0.7;
pub const TOP_P: f64 = 0.9;
pub const TOP_K: u32 = 40;

const DEFAULT_TOPICS: &str = "general knowledge";

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Crossword => "crossword",
            GameType::Wordsearch => "wordsearch",
        }
    }

    // how the puzzle is named inside the prompt
    pub fn display_name(&self) -> &'static str {
        match self {
            GameType::Crossword => "crossword puzzle",
            GameType::Wordsearch => "word search puzzle",
        }
    }

    /// Prompt text for this puzzle kind, with the request's parameters filled in.
    pub fn prompt(&self, req: &PuzzleRequest) -> String {
        let header = format!(
            "Generate a {} {} in {}.\n{}\n",
            req.difficulty.as_str(),
            self.display_name(),
            req.language,
            topics_clause(&req.topics),
        );

        let body = match self {
            GameType::Crossword => {
                "Provide a grid of 8x8 to 10x10.\n\
                 Return the data as a JSON object with 'gameType' (crossword), 'difficulty', 'topics', and 'crosswordData'.\n\
                 'crosswordData' should contain 'gridSize' (rows, cols) and an array of 'words'.\n\
                 Each 'word' object should have 'word', 'clue', 'startRow', 'startCol' (0-indexed), and 'direction' ('across' or 'down').\n\
                 Ensure words fit the grid and intersect correctly without gaps. All cells in a word must be valid letters.\n\
                 Prioritize well-formed and solvable puzzles.\n"
            }
            GameType::Wordsearch => {
                "Provide a grid size based on difficulty: Easy (10x10), Medium (12x12), Hard (15x15).\n\
                 Return the data as a JSON object with 'gameType' (wordsearch), 'difficulty', 'topics', and 'wordSearchData'.\n\
                 'wordSearchData' should contain 'gridSize' (rows, cols) and a list of 'wordsToFind'.\n\
                 Do NOT generate the full grid of letters. ONLY provide gridSize and wordsToFind.\n\
                 The 'wordsToFind' list should contain 10-15 unique words (depending on difficulty) that are relevant to the topics and suitable for a word search puzzle (no spaces, only letters, common vocabulary).\n\
                 Ensure these words are always in uppercase.\n\
                 Prioritize well-formed words and a good mix for the chosen difficulty.\n"
            }
        };

        header + body
    }

    /// Output schema the provider must follow for this puzzle kind.
    pub fn response_schema(&self) -> Value {
        let grid_size = json!({
            "type": "OBJECT",
            "properties": {
                "rows": {"type": "INTEGER"},
                "cols": {"type": "INTEGER"}
            },
            "required": ["rows", "cols"]
        });

        let (data_key, data) = match self {
            GameType::Crossword => (
                "crosswordData",
                json!({
                    "type": "OBJECT",
                    "properties": {
                        "gridSize": grid_size,
                        "words": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "word": {"type": "STRING"},
                                    "clue": {"type": "STRING"},
                                    "startRow": {"type": "INTEGER"},
                                    "startCol": {"type": "INTEGER"},
                                    "direction": {"type": "STRING", "enum": ["across", "down"]}
                                },
                                "required": ["word", "clue", "startRow", "startCol", "direction"]
                            }
                        }
                    },
                    "required": ["gridSize", "words"]
                }),
            ),
            GameType::Wordsearch => (
                "wordSearchData",
                json!({
                    "type": "OBJECT",
                    "properties": {
                        "gridSize": grid_size,
                        "wordsToFind": {
                            "type": "ARRAY",
                            "items": {"type": "STRING"}
                        }
                    },
                    "required": ["gridSize", "wordsToFind"]
                }),
            ),
        };

        let mut schema = json!({
            "type": "OBJECT",
            "properties": {
                "gameType": {"type": "STRING", "enum": [self.as_str()]},
                "difficulty": {"type": "STRING", "enum": ["easy", "medium", "hard"]},
                "topics": {"type": "ARRAY", "items": {"type": "STRING"}}
            },
            "required": ["gameType", "difficulty", "topics"]
        });
        schema["properties"][data_key] = data;
        schema
    }
}

pub fn topics_clause(topics: &[String]) -> String {
    if topics.is_empty() {
        DEFAULT_TOPICS.to_string()
    } else {
        format!("about {}", topics.join(", "))
    }
}
