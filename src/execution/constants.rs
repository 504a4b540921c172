// Constants shared by the model and the scene builders

/// Label of the root scope
pub const GLOBAL_SCOPE_LABEL: &str = "global";

/// Slots per row on the global shelf
pub const GLOBAL_SLOTS_PER_ROW: usize = 1;

/// Slots per row on a call frame's shelf
pub const FRAME_SLOTS_PER_ROW: usize = 2;

/// The token stored in an unoccupied board cell
pub const BLANK_TOKEN: &str = " ";

/// Longest range or repeated list the model will expand
pub const MAX_SEQUENCE_LEN: usize = 1 << 16;
