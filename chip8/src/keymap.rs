use sdl2::keyboard::Keycode;

/// Something the host should do in response to a key going down.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostKey {
    /// A key on the hex keypad
    Keypad(u8),
    Quit,
    TogglePause,
    Save,
    Load,
    /// Pick the save slot used by `Save` and `Load`
    SelectSlot(u8),
    Reset,
}

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// The keypad layout is mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
const KEYPAD: [(Keycode, u8); 16] = [
    (Keycode::Num1, 0x1),
    (Keycode::Num2, 0x2),
    (Keycode::Num3, 0x3),
    (Keycode::Num4, 0xC),
    (Keycode::Q, 0x4),
    (Keycode::W, 0x5),
    (Keycode::E, 0x6),
    (Keycode::R, 0xD),
    (Keycode::A, 0x7),
    (Keycode::S, 0x8),
    (Keycode::D, 0x9),
    (Keycode::F, 0xE),
    (Keycode::Z, 0xA),
    (Keycode::X, 0x0),
    (Keycode::C, 0xB),
    (Keycode::V, 0xF),
];

/// The keypad index for a physical key, if it is part of the mapped block.
pub fn keypad(key: Keycode) -> Option<u8> {
    KEYPAD
        .iter()
        .find(|(code, _)| *code == key)
        .map(|&(_, index)| index)
}

/// Translates a key press into a host action.
///
/// Escape quits, space pauses, F5/F9 save and load, F1-F4 pick slots 0-3 and
/// backspace resets the machine. Everything else goes through `keypad`.
pub fn host_key(key: Keycode) -> Option<HostKey> {
    match key {
        Keycode::Escape => Some(HostKey::Quit),
        Keycode::Space => Some(HostKey::TogglePause),
        Keycode::F5 => Some(HostKey::Save),
        Keycode::F9 => Some(HostKey::Load),
        Keycode::F1 => Some(HostKey::SelectSlot(0)),
        Keycode::F2 => Some(HostKey::SelectSlot(1)),
        Keycode::F3 => Some(HostKey::SelectSlot(2)),
        Keycode::F4 => Some(HostKey::SelectSlot(3)),
        Keycode::Backspace => Some(HostKey::Reset),
        _ => keypad(key).map(HostKey::Keypad),
    }
}
