use crate::engine::Modifier;
use crate::error::{Error, Result};

/// Physical key codes understood by the engine.
///
/// Values are the macOS ANSI virtual key codes the host reports in its
/// key events, so a code can be passed straight through without translation.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VirtualKey {
    // Letter keys
    KeyA = 0x00,
    KeyS = 0x01,
    KeyD = 0x02,
    KeyF = 0x03,
    KeyH = 0x04,
    KeyG = 0x05,
    KeyZ = 0x06,
    KeyX = 0x07,
    KeyC = 0x08,
    KeyV = 0x09,
    KeyB = 0x0B,
    KeyQ = 0x0C,
    KeyW = 0x0D,
    KeyE = 0x0E,
    KeyR = 0x0F,
    KeyY = 0x10,
    KeyT = 0x11,

    // Number row
    Key1 = 0x12,
    Key2 = 0x13,
    Key3 = 0x14,
    Key4 = 0x15,
    Key6 = 0x16,
    Key5 = 0x17,
    Equal = 0x18,
    Key9 = 0x19,
    Key7 = 0x1A,
    Minus = 0x1B,
    Key8 = 0x1C,
    Key0 = 0x1D,

    RightBracket = 0x1E,
    KeyO = 0x1F,
    KeyU = 0x20,
    LeftBracket = 0x21,
    KeyI = 0x22,
    KeyP = 0x23,
    Return = 0x24,
    KeyL = 0x25,
    KeyJ = 0x26,
    Quote = 0x27,
    KeyK = 0x28,
    Semicolon = 0x29,
    Backslash = 0x2A,
    Comma = 0x2B,
    Slash = 0x2C,
    KeyN = 0x2D,
    KeyM = 0x2E,
    Period = 0x2F,

    // Control keys
    Tab = 0x30,
    Space = 0x31,
    Grave = 0x32,
    Delete = 0x33,          // Backspace
    Escape = 0x35,
    RightCommand = 0x36,
    Command = 0x37,
    Shift = 0x38,
    CapsLock = 0x39,
    Option = 0x3A,
    Control = 0x3B,
    RightShift = 0x3C,
    RightOption = 0x3D,
    RightControl = 0x3E,
    Function = 0x3F,
    ForwardDelete = 0x75,

    // Arrows
    LeftArrow = 0x7B,
    RightArrow = 0x7C,
    DownArrow = 0x7D,
    UpArrow = 0x7E,
}

/// Every known key, in code order
pub const ALL_KEYS: [VirtualKey; 67] = [
    VirtualKey::KeyA, VirtualKey::KeyS, VirtualKey::KeyD, VirtualKey::KeyF,
    VirtualKey::KeyH, VirtualKey::KeyG, VirtualKey::KeyZ, VirtualKey::KeyX,
    VirtualKey::KeyC, VirtualKey::KeyV, VirtualKey::KeyB, VirtualKey::KeyQ,
    VirtualKey::KeyW, VirtualKey::KeyE, VirtualKey::KeyR, VirtualKey::KeyY,
    VirtualKey::KeyT, VirtualKey::Key1, VirtualKey::Key2, VirtualKey::Key3,
    VirtualKey::Key4, VirtualKey::Key6, VirtualKey::Key5, VirtualKey::Equal,
    VirtualKey::Key9, VirtualKey::Key7, VirtualKey::Minus, VirtualKey::Key8,
    VirtualKey::Key0, VirtualKey::RightBracket, VirtualKey::KeyO, VirtualKey::KeyU,
    VirtualKey::LeftBracket, VirtualKey::KeyI, VirtualKey::KeyP, VirtualKey::Return,
    VirtualKey::KeyL, VirtualKey::KeyJ, VirtualKey::Quote, VirtualKey::KeyK,
    VirtualKey::Semicolon, VirtualKey::Backslash, VirtualKey::Comma, VirtualKey::Slash,
    VirtualKey::KeyN, VirtualKey::KeyM, VirtualKey::Period, VirtualKey::Tab,
    VirtualKey::Space, VirtualKey::Grave, VirtualKey::Delete, VirtualKey::Escape,
    VirtualKey::RightCommand, VirtualKey::Command, VirtualKey::Shift, VirtualKey::CapsLock,
    VirtualKey::Option, VirtualKey::Control, VirtualKey::RightShift, VirtualKey::RightOption,
    VirtualKey::RightControl, VirtualKey::Function, VirtualKey::ForwardDelete,
    VirtualKey::LeftArrow, VirtualKey::RightArrow, VirtualKey::DownArrow, VirtualKey::UpArrow,
];

impl VirtualKey {
    /// Raw key code
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up a key by its raw code
    pub fn from_code(code: u16) -> Option<Self> {
        ALL_KEYS.iter().copied().find(|k| k.code() == code)
    }

    /// Parse a key identifier like "SPACE", "a", ";" or "CapsLock"
    ///
    /// # Examples
    /// ```
    /// use macime_core::VirtualKey;
    ///
    /// assert_eq!(VirtualKey::from_name("space").unwrap(), VirtualKey::Space);
    /// assert_eq!(VirtualKey::from_name(";").unwrap(), VirtualKey::Semicolon);
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        let upper = name.trim().to_uppercase();
        if upper.is_empty() {
            return Err(Error::UnknownKey("empty key name".to_string()));
        }

        let mut chars = upper.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Self::from_char(ch.to_ascii_lowercase())
                .ok_or_else(|| Error::UnknownKey(name.to_string()));
        }

        match upper.as_str() {
            "SPACE" => Ok(VirtualKey::Space),
            "ENTER" | "RETURN" => Ok(VirtualKey::Return),
            "TAB" => Ok(VirtualKey::Tab),
            "BACKSPACE" | "BACK" | "DELETE" => Ok(VirtualKey::Delete),
            "FORWARDDELETE" => Ok(VirtualKey::ForwardDelete),
            "ESCAPE" | "ESC" => Ok(VirtualKey::Escape),
            "CAPSLOCK" | "CAPS" => Ok(VirtualKey::CapsLock),
            "SHIFT" | "LSHIFT" => Ok(VirtualKey::Shift),
            "RSHIFT" => Ok(VirtualKey::RightShift),
            "CTRL" | "CONTROL" | "LCTRL" => Ok(VirtualKey::Control),
            "RCTRL" => Ok(VirtualKey::RightControl),
            "ALT" | "OPTION" | "LALT" => Ok(VirtualKey::Option),
            "RALT" | "ROPTION" => Ok(VirtualKey::RightOption),
            "CMD" | "COMMAND" | "META" | "LCMD" => Ok(VirtualKey::Command),
            "RCMD" | "RCOMMAND" => Ok(VirtualKey::RightCommand),
            "FN" | "FUNCTION" => Ok(VirtualKey::Function),
            "LEFT" => Ok(VirtualKey::LeftArrow),
            "RIGHT" => Ok(VirtualKey::RightArrow),
            "UP" => Ok(VirtualKey::UpArrow),
            "DOWN" => Ok(VirtualKey::DownArrow),

            "EQUAL" | "PLUS" => Ok(VirtualKey::Equal),
            "MINUS" => Ok(VirtualKey::Minus),
            "COMMA" => Ok(VirtualKey::Comma),
            "PERIOD" => Ok(VirtualKey::Period),
            "SEMICOLON" => Ok(VirtualKey::Semicolon),
            "SLASH" => Ok(VirtualKey::Slash),
            "GRAVE" => Ok(VirtualKey::Grave),
            "LEFTBRACKET" => Ok(VirtualKey::LeftBracket),
            "RIGHTBRACKET" => Ok(VirtualKey::RightBracket),
            "BACKSLASH" => Ok(VirtualKey::Backslash),
            "QUOTE" => Ok(VirtualKey::Quote),

            _ => Err(Error::UnknownKey(name.to_string())),
        }
    }

    /// Canonical name, accepted back by [`VirtualKey::from_name`]
    pub fn name(self) -> &'static str {
        match self {
            VirtualKey::KeyA => "A",
            VirtualKey::KeyB => "B",
            VirtualKey::KeyC => "C",
            VirtualKey::KeyD => "D",
            VirtualKey::KeyE => "E",
            VirtualKey::KeyF => "F",
            VirtualKey::KeyG => "G",
            VirtualKey::KeyH => "H",
            VirtualKey::KeyI => "I",
            VirtualKey::KeyJ => "J",
            VirtualKey::KeyK => "K",
            VirtualKey::KeyL => "L",
            VirtualKey::KeyM => "M",
            VirtualKey::KeyN => "N",
            VirtualKey::KeyO => "O",
            VirtualKey::KeyP => "P",
            VirtualKey::KeyQ => "Q",
            VirtualKey::KeyR => "R",
            VirtualKey::KeyS => "S",
            VirtualKey::KeyT => "T",
            VirtualKey::KeyU => "U",
            VirtualKey::KeyV => "V",
            VirtualKey::KeyW => "W",
            VirtualKey::KeyX => "X",
            VirtualKey::KeyY => "Y",
            VirtualKey::KeyZ => "Z",
            VirtualKey::Key0 => "0",
            VirtualKey::Key1 => "1",
            VirtualKey::Key2 => "2",
            VirtualKey::Key3 => "3",
            VirtualKey::Key4 => "4",
            VirtualKey::Key5 => "5",
            VirtualKey::Key6 => "6",
            VirtualKey::Key7 => "7",
            VirtualKey::Key8 => "8",
            VirtualKey::Key9 => "9",
            VirtualKey::Equal => "EQUAL",
            VirtualKey::Minus => "MINUS",
            VirtualKey::LeftBracket => "LEFTBRACKET",
            VirtualKey::RightBracket => "RIGHTBRACKET",
            VirtualKey::Quote => "QUOTE",
            VirtualKey::Semicolon => "SEMICOLON",
            VirtualKey::Backslash => "BACKSLASH",
            VirtualKey::Comma => "COMMA",
            VirtualKey::Slash => "SLASH",
            VirtualKey::Period => "PERIOD",
            VirtualKey::Grave => "GRAVE",
            VirtualKey::Return => "RETURN",
            VirtualKey::Tab => "TAB",
            VirtualKey::Space => "SPACE",
            VirtualKey::Delete => "DELETE",
            VirtualKey::ForwardDelete => "FORWARDDELETE",
            VirtualKey::Escape => "ESCAPE",
            VirtualKey::Command => "COMMAND",
            VirtualKey::RightCommand => "RCOMMAND",
            VirtualKey::Shift => "SHIFT",
            VirtualKey::RightShift => "RSHIFT",
            VirtualKey::CapsLock => "CAPSLOCK",
            VirtualKey::Option => "OPTION",
            VirtualKey::RightOption => "ROPTION",
            VirtualKey::Control => "CONTROL",
            VirtualKey::RightControl => "RCTRL",
            VirtualKey::Function => "FUNCTION",
            VirtualKey::LeftArrow => "LEFT",
            VirtualKey::RightArrow => "RIGHT",
            VirtualKey::DownArrow => "DOWN",
            VirtualKey::UpArrow => "UP",
        }
    }

    /// Key that types `ch` on a US ANSI layout without shift
    fn from_char(ch: char) -> Option<Self> {
        ALL_KEYS.iter().copied().find(|k| k.to_char(false) == Some(ch))
    }

    /// Character this key types on a US ANSI layout
    pub fn to_char(self, shift: bool) -> Option<char> {
        let (plain, shifted) = match self {
            VirtualKey::KeyA => ('a', 'A'),
            VirtualKey::KeyB => ('b', 'B'),
            VirtualKey::KeyC => ('c', 'C'),
            VirtualKey::KeyD => ('d', 'D'),
            VirtualKey::KeyE => ('e', 'E'),
            VirtualKey::KeyF => ('f', 'F'),
            VirtualKey::KeyG => ('g', 'G'),
            VirtualKey::KeyH => ('h', 'H'),
            VirtualKey::KeyI => ('i', 'I'),
            VirtualKey::KeyJ => ('j', 'J'),
            VirtualKey::KeyK => ('k', 'K'),
            VirtualKey::KeyL => ('l', 'L'),
            VirtualKey::KeyM => ('m', 'M'),
            VirtualKey::KeyN => ('n', 'N'),
            VirtualKey::KeyO => ('o', 'O'),
            VirtualKey::KeyP => ('p', 'P'),
            VirtualKey::KeyQ => ('q', 'Q'),
            VirtualKey::KeyR => ('r', 'R'),
            VirtualKey::KeyS => ('s', 'S'),
            VirtualKey::KeyT => ('t', 'T'),
            VirtualKey::KeyU => ('u', 'U'),
            VirtualKey::KeyV => ('v', 'V'),
            VirtualKey::KeyW => ('w', 'W'),
            VirtualKey::KeyX => ('x', 'X'),
            VirtualKey::KeyY => ('y', 'Y'),
            VirtualKey::KeyZ => ('z', 'Z'),
            VirtualKey::Key0 => ('0', ')'),
            VirtualKey::Key1 => ('1', '!'),
            VirtualKey::Key2 => ('2', '@'),
            VirtualKey::Key3 => ('3', '#'),
            VirtualKey::Key4 => ('4', '$'),
            VirtualKey::Key5 => ('5', '%'),
            VirtualKey::Key6 => ('6', '^'),
            VirtualKey::Key7 => ('7', '&'),
            VirtualKey::Key8 => ('8', '*'),
            VirtualKey::Key9 => ('9', '('),
            VirtualKey::Equal => ('=', '+'),
            VirtualKey::Minus => ('-', '_'),
            VirtualKey::LeftBracket => ('[', '{'),
            VirtualKey::RightBracket => (']', '}'),
            VirtualKey::Quote => ('\'', '"'),
            VirtualKey::Semicolon => (';', ':'),
            VirtualKey::Backslash => ('\\', '|'),
            VirtualKey::Comma => (',', '<'),
            VirtualKey::Slash => ('/', '?'),
            VirtualKey::Period => ('.', '>'),
            VirtualKey::Grave => ('`', '~'),
            _ => return None,
        };
        Some(if shift { shifted } else { plain })
    }

    /// Modifier flag owned by this key, if it is a modifier key
    pub fn modifier(self) -> Option<Modifier> {
        match self {
            VirtualKey::Shift | VirtualKey::RightShift => Some(Modifier::Shift),
            VirtualKey::Control | VirtualKey::RightControl => Some(Modifier::Control),
            VirtualKey::Option | VirtualKey::RightOption => Some(Modifier::Option),
            VirtualKey::Command | VirtualKey::RightCommand => Some(Modifier::Command),
            VirtualKey::CapsLock => Some(Modifier::CapsLock),
            _ => None,
        }
    }

    /// Keys the host reports through flag changes rather than Down/Up
    pub fn is_modifier_key(self) -> bool {
        self.modifier().is_some() || self == VirtualKey::Function
    }
}
