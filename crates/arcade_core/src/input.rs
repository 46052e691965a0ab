//! Key-state tables with held (level) and pressed-once (edge) queries.
//!
//! - **Held:** `is_held(key)` reads the current table. True every tick the
//!   key is physically down.
//!
//! - **Pressed once:** `pressed_once(key)` is true only on the up -> down
//!   transition. The query itself consumes the edge by copying the current
//!   state into the previous table, so it must be asked at most once per key
//!   per tick. A second query in the same tick reports false.
//!
//! Both tables are fixed-size arrays indexed by `Key`; only the event pump
//! (`key_down`/`key_up`), `pressed_once` and `clear_all` mutate them.

/// Symbolic key codes. Backends map their native codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    Space,
    Exclaim,
    Quote,
    Hash,
    Dollar,
    Percent,
    Ampersand,
    Apostrophe,
    LeftParen,
    RightParen,
    Asterisk,
    Plus,
    Comma,
    Minus,
    Period,
    Slash,
    Colon,
    Semicolon,
    Less,
    Equals,
    Greater,
    Question,
    At,
    LeftBracket,
    Backslash,
    RightBracket,
    Caret,
    Underscore,
    Backtick,
    LeftBrace,
    Pipe,
    RightBrace,
    Tilde,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Shift,
    Ctrl,
    Alt,
    Tab,
    CapsLock,
    Backspace,
}

impl Key {
    pub const COUNT: usize = 81;

    /// Every key in declaration order.
    pub const ALL: [Key; Key::COUNT] = [
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
        Key::Num0,
        Key::Num1,
        Key::Num2,
        Key::Num3,
        Key::Num4,
        Key::Num5,
        Key::Num6,
        Key::Num7,
        Key::Num8,
        Key::Num9,
        Key::Space,
        Key::Exclaim,
        Key::Quote,
        Key::Hash,
        Key::Dollar,
        Key::Percent,
        Key::Ampersand,
        Key::Apostrophe,
        Key::LeftParen,
        Key::RightParen,
        Key::Asterisk,
        Key::Plus,
        Key::Comma,
        Key::Minus,
        Key::Period,
        Key::Slash,
        Key::Colon,
        Key::Semicolon,
        Key::Less,
        Key::Equals,
        Key::Greater,
        Key::Question,
        Key::At,
        Key::LeftBracket,
        Key::Backslash,
        Key::RightBracket,
        Key::Caret,
        Key::Underscore,
        Key::Backtick,
        Key::LeftBrace,
        Key::Pipe,
        Key::RightBrace,
        Key::Tilde,
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Enter,
        Key::Escape,
        Key::Shift,
        Key::Ctrl,
        Key::Alt,
        Key::Tab,
        Key::CapsLock,
        Key::Backspace,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Map a printable character to its key. Letters are case-insensitive.
    pub fn from_char(c: char) -> Option<Key> {
        const LETTERS: [Key; 26] = [
            Key::A,
            Key::B,
            Key::C,
            Key::D,
            Key::E,
            Key::F,
            Key::G,
            Key::H,
            Key::I,
            Key::J,
            Key::K,
            Key::L,
            Key::M,
            Key::N,
            Key::O,
            Key::P,
            Key::Q,
            Key::R,
            Key::S,
            Key::T,
            Key::U,
            Key::V,
            Key::W,
            Key::X,
            Key::Y,
            Key::Z,
        ];
        const DIGITS: [Key; 10] = [
            Key::Num0,
            Key::Num1,
            Key::Num2,
            Key::Num3,
            Key::Num4,
            Key::Num5,
            Key::Num6,
            Key::Num7,
            Key::Num8,
            Key::Num9,
        ];

        let lower = c.to_ascii_lowercase();
        if lower.is_ascii_lowercase() {
            return Some(LETTERS[(lower as u8 - b'a') as usize]);
        }
        if c.is_ascii_digit() {
            return Some(DIGITS[(c as u8 - b'0') as usize]);
        }
        let key = match c {
            ' ' => Key::Space,
            '!' => Key::Exclaim,
            '"' => Key::Quote,
            '#' => Key::Hash,
            '$' => Key::Dollar,
            '%' => Key::Percent,
            '&' => Key::Ampersand,
            '\'' => Key::Apostrophe,
            '(' => Key::LeftParen,
            ')' => Key::RightParen,
            '*' => Key::Asterisk,
            '+' => Key::Plus,
            ',' => Key::Comma,
            '-' => Key::Minus,
            '.' => Key::Period,
            '/' => Key::Slash,
            ':' => Key::Colon,
            ';' => Key::Semicolon,
            '<' => Key::Less,
            '=' => Key::Equals,
            '>' => Key::Greater,
            '?' => Key::Question,
            '@' => Key::At,
            '[' => Key::LeftBracket,
            '\\' => Key::Backslash,
            ']' => Key::RightBracket,
            '^' => Key::Caret,
            '_' => Key::Underscore,
            '`' => Key::Backtick,
            '{' => Key::LeftBrace,
            '|' => Key::Pipe,
            '}' => Key::RightBrace,
            '~' => Key::Tilde,
            '\r' | '\n' => Key::Enter,
            '\t' => Key::Tab,
            _ => return None,
        };
        Some(key)
    }
}

pub struct InputState {
    current: [bool; Key::COUNT],
    previous: [bool; Key::COUNT],
}

impl InputState {
    pub fn new() -> Self {
        Self {
            current: [false; Key::COUNT],
            previous: [false; Key::COUNT],
        }
    }

    pub fn key_down(&mut self, key: Key) {
        self.current[key.index()] = true;
    }

    pub fn key_up(&mut self, key: Key) {
        self.current[key.index()] = false;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.current[key.index()]
    }

    /// True on the tick `key` went from up to down. Consumes the edge.
    pub fn pressed_once(&mut self, key: Key) -> bool {
        let i = key.index();
        let current = self.current[i];
        let last = std::mem::replace(&mut self.previous[i], current);
        current && !last
    }

    /// Force every key up in both tables. Call at state transitions so a
    /// key held across the boundary does not leak into the next screen.
    pub fn clear_all(&mut self) {
        self.current = [false; Key::COUNT];
        self.previous = [false; Key::COUNT];
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
