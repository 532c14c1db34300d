//! Keys, key notation and the Normal-mode keymap.
//!
//! ## Learning: Lookup Tables over Match Ladders
//!
//! Normal-mode keys resolve through a table of bindings instead of a
//! hard-coded `match`. The defaults reproduce the classic `hjkl` layout,
//! and users can add their own bindings from the config file without
//! touching the dispatcher.

use crate::config::Config;
use crate::mode::EditorMode;
use crate::{CoreError, CoreResult};
use std::collections::HashMap;

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Cmd on macOS, the Windows key elsewhere
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };
    pub const CTRL: Self = Self { ctrl: true, ..Self::NONE };
    pub const SHIFT: Self = Self { shift: true, ..Self::NONE };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Ctrl, Alt or Meta. Shift on its own only picks the character.
    pub fn is_chord(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }

    /// Parses `+`-separated names such as `ctrl+shift`. Unknown names
    /// give `None`; the empty string is no modifiers.
    pub fn parse(s: &str) -> Option<Self> {
        let mut mods = Self::NONE;
        for name in s.split('+').filter(|name| !name.is_empty()) {
            let flag = match name.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => &mut mods.ctrl,
                "alt" | "option" => &mut mods.alt,
                "shift" => &mut mods.shift,
                "meta" | "cmd" | "super" | "win" => &mut mods.meta,
                _ => return None,
            };
            *flag = true;
        }
        Some(mods)
    }

    /// Reads Vim prefix letters (`C`, `A` or `M`, `S`, `D`), e.g. the
    /// `CS` of `<CS-Left>`.
    fn from_vim_prefix(prefix: &str) -> Option<Self> {
        if prefix.is_empty() {
            return None;
        }
        let mut mods = Self::NONE;
        for letter in prefix.chars() {
            let flag = match letter.to_ascii_uppercase() {
                'C' => &mut mods.ctrl,
                'A' | 'M' => &mut mods.alt,
                'S' => &mut mods.shift,
                'D' => &mut mods.meta,
                _ => return None,
            };
            *flag = true;
        }
        Some(mods)
    }

    /// Vim prefix letters, e.g. `CS` for ctrl+shift.
    fn vim_prefix(&self) -> String {
        [(self.ctrl, 'C'), (self.alt, 'A'), (self.shift, 'S'), (self.meta, 'D')]
            .into_iter()
            .filter_map(|(held, letter)| held.then_some(letter))
            .collect()
    }
}

/// Which key was pressed, independent of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

/// Named keys with their Vim spelling first; later spellings are
/// accepted when parsing.
const KEY_NAMES: &[(Key, &[&str])] = &[
    (Key::Enter, &["CR", "enter", "return"]),
    (Key::Tab, &["Tab"]),
    (Key::Backspace, &["BS", "backspace"]),
    (Key::Delete, &["Del", "delete"]),
    (Key::Escape, &["Esc", "escape"]),
    (Key::Up, &["Up"]),
    (Key::Down, &["Down"]),
    (Key::Left, &["Left"]),
    (Key::Right, &["Right"]),
    (Key::Home, &["Home"]),
    (Key::End, &["End"]),
    (Key::Char(' '), &["Space"]),
    (Key::Char('<'), &["lt"]),
];

impl Key {
    /// Parses a key name (case-insensitive) or a single character.
    pub fn parse(s: &str) -> Option<Self> {
        Self::named(s).or_else(|| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::Char(c)),
                _ => None,
            }
        })
    }

    /// Looks `s` up among the key names only.
    fn named(s: &str) -> Option<Self> {
        KEY_NAMES
            .iter()
            .find(|(_, names)| names.iter().any(|name| name.eq_ignore_ascii_case(s)))
            .map(|&(key, _)| key)
    }

    /// The Vim name for keys that need `<...>`, `None` for plain
    /// characters.
    fn vim_name(self) -> Option<&'static str> {
        KEY_NAMES
            .iter()
            .find(|&&(key, _)| key == self)
            .map(|(_, names)| names[0])
    }
}

/// A key together with the modifiers held while pressing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn char(c: char) -> Self {
        Self::plain(Key::Char(c))
    }

    /// Parses config-file spelling: `ctrl+g`, `esc`, `ctrl++`.
    pub fn parse(s: &str) -> Option<Self> {
        let (mods, key) = match s.rsplit_once('+') {
            Some((mods, "")) => (mods, "+"),
            Some(split) => split,
            None => ("", s),
        };
        Some(Self::new(Key::parse(key)?, Modifiers::parse(mods)?))
    }

    /// Parses Vim-style key notation into a sequence of key presses.
    ///
    /// Every character stands for itself, spaces included, so
    /// `":cargo run<CR>"` types the command as written. Inside `<...>`
    /// only key names (`<Esc>`, `<CR>`, `<Tab>`, `<BS>`, `<Space>`,
    /// `<lt>`, ...) and modifier chords such as `<C-g>` are special.
    /// Any other `<` is a literal `<`, so `Vec<T>` is six keys.
    ///
    /// # Example
    /// ```
    /// use oxidevim_core::keymap::{Key, KeyPress};
    ///
    /// let keys = KeyPress::parse_sequence(":w<CR>").unwrap();
    /// assert_eq!(keys, vec![KeyPress::char(':'), KeyPress::char('w'), KeyPress::plain(Key::Enter)]);
    /// ```
    pub fn parse_sequence(s: &str) -> CoreResult<Vec<KeyPress>> {
        let mut keys = Vec::new();
        let mut rest = s;

        while let Some(c) = rest.chars().next() {
            if c == '<' {
                if let Some(name) = Self::bracketed_name(rest) {
                    if let Some(key) = Self::parse_bracketed(name)? {
                        keys.push(key);
                        rest = &rest[name.len() + 2..];
                        continue;
                    }
                }
            }

            keys.push(Self::char(c));
            rest = &rest[c.len_utf8()..];
        }

        Ok(keys)
    }

    /// Returns the text between a leading `<` and its `>`, if it could
    /// be a key name.
    fn bracketed_name(s: &str) -> Option<&str> {
        let close = s.find('>')?;
        let name = &s[1..close];
        let plausible = !name.is_empty() && !name.contains(|c: char| c == '<' || c.is_whitespace());
        plausible.then_some(name)
    }

    /// `Ok(None)` when `name` is neither a key name nor a chord, in which
    /// case the brackets are ordinary text. A chord with a bad key part,
    /// like `<C-Bogus>`, is an error.
    fn parse_bracketed(name: &str) -> CoreResult<Option<KeyPress>> {
        if let Some(key) = Key::named(name) {
            return Ok(Some(KeyPress::plain(key)));
        }

        let Some((prefix, key_name)) = name.split_once('-') else {
            return Ok(None);
        };
        let Some(modifiers) = Modifiers::from_vim_prefix(prefix) else {
            return Ok(None);
        };
        if key_name.is_empty() {
            return Ok(None);
        }

        let key = Key::parse(key_name).ok_or_else(|| CoreError::InvalidKey(format!("<{name}>")))?;
        Ok(Some(KeyPress::new(key, modifiers)))
    }

    /// Drops shift from character keys, where it is already reflected in
    /// the character itself.
    fn normalized(self) -> Self {
        match self.key {
            Key::Char(_) if self.modifiers.shift => Self {
                modifiers: Modifiers {
                    shift: false,
                    ..self.modifiers
                },
                ..self
            },
            _ => self,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self, self.vim_name()) {
            (_, Some(name)) => f.write_str(name),
            (Key::Char(c), None) => write!(f, "{c}"),
            (key, None) => write!(f, "{key:?}"),
        }
    }
}

/// Writes Vim notation, the same form `parse_sequence` reads.
impl std::fmt::Display for KeyPress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.modifiers.is_empty(), self.key) {
            (true, Key::Char(c)) if self.key.vim_name().is_none() => write!(f, "{c}"),
            (true, key) => write!(f, "<{key}>"),
            (false, key) => write!(f, "<{}-{key}>", self.modifiers.vim_prefix()),
        }
    }
}

/// Something a Normal-mode key can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    EnterInsertMode,
    EnterCommandMode,
    EnterVisualMode,
    ToggleGraph,
}

impl Action {
    /// Parses an action name used in `[keyboard.bindings]`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cursor.left" => Some(Action::MoveLeft),
            "cursor.right" => Some(Action::MoveRight),
            "cursor.up" => Some(Action::MoveUp),
            "cursor.down" => Some(Action::MoveDown),
            "mode.insert" => Some(Action::EnterInsertMode),
            "mode.command" => Some(Action::EnterCommandMode),
            "mode.visual" => Some(Action::EnterVisualMode),
            "graph.toggle" => Some(Action::ToggleGraph),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyPress,
    pub action: Action,
    /// Modes the binding answers in
    pub modes: Vec<EditorMode>,
}

impl KeyBinding {
    /// Binding active only in Normal mode.
    pub fn normal(key: KeyPress, action: Action) -> Self {
        Self {
            key,
            action,
            modes: vec![EditorMode::Normal],
        }
    }
}

/// Normal-mode bindings: the built-in `hjkl` set, then the user's.
pub struct Keymap {
    /// In insertion order; the last match wins.
    bindings: Vec<KeyBinding>,
    /// Binding indices per normalized key
    by_key: HashMap<KeyPress, Vec<usize>>,
}

impl Keymap {
    /// Built-in bindings only.
    pub fn new() -> Self {
        let mut keymap = Self {
            bindings: Vec::new(),
            by_key: HashMap::new(),
        };
        keymap.add_default_bindings();
        keymap.rebuild_index();
        keymap
    }

    /// Built-in bindings plus `[keyboard.bindings]`.
    ///
    /// User bindings are layered on top of the defaults. Entries whose key
    /// or action cannot be parsed are skipped with a warning.
    pub fn from_config(config: &Config) -> Self {
        let mut keymap = Self::new();

        for (key_str, action_str) in &config.keyboard.bindings {
            match (KeyPress::parse(key_str), Action::parse(action_str)) {
                (Some(key), Some(action)) => {
                    keymap.bindings.push(KeyBinding::normal(key, action));
                }
                _ => tracing::warn!(key = %key_str, action = %action_str, "skipping invalid key binding"),
            }
        }

        keymap.rebuild_index();
        keymap
    }

    fn add_default_bindings(&mut self) {
        use Action::*;

        let bindings = [
            (Key::Char('h'), MoveLeft),
            (Key::Left, MoveLeft),
            (Key::Char('l'), MoveRight),
            (Key::Right, MoveRight),
            (Key::Char('j'), MoveDown),
            (Key::Down, MoveDown),
            (Key::Char('k'), MoveUp),
            (Key::Up, MoveUp),
            (Key::Char('i'), EnterInsertMode),
            (Key::Char(':'), EnterCommandMode),
            (Key::Char('v'), EnterVisualMode),
        ];

        for (key, action) in bindings {
            self.bindings
                .push(KeyBinding::normal(KeyPress::plain(key), action));
        }
    }

    fn rebuild_index(&mut self) {
        self.by_key.clear();
        for (i, binding) in self.bindings.iter().enumerate() {
            self.by_key
                .entry(binding.key.normalized())
                .or_default()
                .push(i);
        }
    }

    /// Looks up the action bound to a key in a mode.
    pub fn lookup(&self, key: KeyPress, mode: EditorMode) -> Option<Action> {
        self.by_key
            .get(&key.normalized())?
            .iter()
            .rev()
            .map(|&i| &self.bindings[i])
            .find(|binding| binding.modes.contains(&mode))
            .map(|binding| binding.action)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}
