/// Control flags held this tick
///
/// If both `accelerate` and `reverse` are held, `accelerate` wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputState {
    pub accelerate: bool,
    pub reverse: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub brake: bool,
    /// Shift, selects turbo while accelerating
    pub boost_modifier: bool,
    pub nitro: bool,
    pub fire: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Physical keys understood by the game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Space,
    Shift,
    E,
    F,
    /// Cycles the camera view, not a driving control
    C,
}

impl Key {
    /// Maps a DOM-style `KeyboardEvent.key` string. Letters are case-insensitive.
    #[must_use]
    pub fn from_key_name(name: &str) -> Option<Self> {
        let key = match name {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            " " => Self::Space,
            "Shift" => Self::Shift,
            "w" | "W" => Self::W,
            "a" | "A" => Self::A,
            "s" | "S" => Self::S,
            "d" | "D" => Self::D,
            "e" | "E" => Self::E,
            "f" | "F" => Self::F,
            "c" | "C" => Self::C,
            _ => return None,
        };
        Some(key)
    }
}

impl InputState {
    pub const DEFAULT: Self = Self {
        accelerate: false,
        reverse: false,
        steer_left: false,
        steer_right: false,
        brake: false,
        boost_modifier: false,
        nitro: false,
        fire: false,
    };

    /// Applies a key press or release. Returns false for keys that aren't driving controls.
    pub const fn set_key(&mut self, key: Key, pressed: bool) -> bool {
        let flag = match key {
            Key::ArrowUp | Key::W => &mut self.accelerate,
            Key::ArrowDown | Key::S => &mut self.reverse,
            Key::ArrowLeft | Key::A => &mut self.steer_left,
            Key::ArrowRight | Key::D => &mut self.steer_right,
            Key::Space => &mut self.brake,
            Key::Shift => &mut self.boost_modifier,
            Key::E => &mut self.nitro,
            Key::F => &mut self.fire,
            Key::C => return false,
        };
        *flag = pressed;
        true
    }

    /// Turbo is only engaged while accelerating
    #[must_use]
    pub const fn is_boosted(&self) -> bool {
        self.accelerate && self.boost_modifier
    }
}
