//! Text editing for the "add movie" form.
//!
//! Cursor positions are in chars, not bytes.

use crate::model::{Movie, normalize_poster_path};

/// Single-line editable text with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub text: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.byte_index(self.cursor);
        self.text.insert(byte_idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.byte_index(self.cursor);
            self.text.remove(byte_idx);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let byte_idx = self.byte_index(self.cursor);
            self.text.remove(byte_idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Deletes the word before the cursor, along with any whitespace after it.
    pub fn delete_word(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let chars: Vec<char> = self.text.chars().collect();
        let mut i = self.cursor;
        while i > 0 && chars[i - 1].is_whitespace() {
            i -= 1;
        }
        while i > 0 && !chars[i - 1].is_whitespace() {
            i -= 1;
        }

        let byte_start = self.byte_index(i);
        let byte_end = self.byte_index(self.cursor);
        self.text.replace_range(byte_start..byte_end, "");
        self.cursor = i;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Overview,
    PosterPath,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Title, FormField::Overview, FormField::PosterPath];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Overview => "Overview",
            FormField::PosterPath => "Poster path",
        }
    }

    fn index(self) -> usize {
        match self {
            FormField::Title => 0,
            FormField::Overview => 1,
            FormField::PosterPath => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// State of the "add to watchlist" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMovieForm {
    inputs: [TextInput; 3],
    pub focused: FormField,
    /// Validation message from the last submit attempt.
    pub error: Option<String>,
}

impl Default for AddMovieForm {
    fn default() -> Self {
        Self {
            inputs: Default::default(),
            focused: FormField::Title,
            error: None,
        }
    }
}

impl AddMovieForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self, field: FormField) -> &TextInput {
        &self.inputs[field.index()]
    }

    pub fn input_mut(&mut self, field: FormField) -> &mut TextInput {
        &mut self.inputs[field.index()]
    }

    pub fn focused_input_mut(&mut self) -> &mut TextInput {
        self.input_mut(self.focused)
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.focused.prev();
    }

    /// Builds the record to add. An empty title is refused and recorded in `error`.
    pub fn to_movie(&mut self) -> Option<Movie> {
        let title = self.input(FormField::Title).text.trim().to_string();
        if title.is_empty() {
            self.error = Some("Title is required".to_string());
            self.focused = FormField::Title;
            return None;
        }
        let overview = self.input(FormField::Overview).text.trim().to_string();
        let poster_path = normalize_poster_path(&self.input(FormField::PosterPath).text);
        self.error = None;
        Some(Movie::new(title, overview, poster_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace_respect_cursor() {
        let mut input = TextInput::new("Dne");
        input.move_to_start();
        input.move_right();
        input.insert_char('u');
        assert_eq!(input.text, "Dune");
        assert_eq!(input.cursor, 2);
        input.backspace();
        assert_eq!(input.text, "Dne");
        input.delete();
        assert_eq!(input.text, "De");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::new("Amélie");
        input.move_left();
        input.move_left();
        input.move_left();
        input.backspace();
        assert_eq!(input.text, "Amlie");
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn test_delete_word() {
        let mut input = TextInput::new("The Thing  ");
        input.delete_word();
        assert_eq!(input.text, "The ");
        assert_eq!(input.cursor, 4);
        input.delete_word();
        assert_eq!(input.text, "");
        input.delete_word();
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_focus_cycles_through_fields() {
        let mut form = AddMovieForm::new();
        form.focus_next();
        assert_eq!(form.focused, FormField::Overview);
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focused, FormField::Title);
        form.focus_prev();
        assert_eq!(form.focused, FormField::PosterPath);
    }

    #[test]
    fn test_to_movie_requires_title() {
        let mut form = AddMovieForm::new();
        form.focus_next();
        form.focused_input_mut().insert_char('x');
        assert_eq!(form.to_movie(), None);
        assert_eq!(form.focused, FormField::Title);
        assert!(form.error.is_some());
    }

    #[test]
    fn test_to_movie_normalizes_poster_path() {
        let mut form = AddMovieForm::new();
        *form.input_mut(FormField::Title) = TextInput::new(" Dune ");
        *form.input_mut(FormField::PosterPath) = TextInput::new("d.jpg");
        let movie = form.to_movie().unwrap();
        assert_eq!(movie.title, "Dune");
        assert_eq!(movie.overview, "");
        assert_eq!(movie.poster_path.as_deref(), Some("/d.jpg"));
        assert_eq!(form.error, None);
    }
}
