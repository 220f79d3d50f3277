//! Helpers shared by the CLI commands.

use anyhow::Context;
use howl_config::{ParamStore, Preset};
use std::path::Path;

/// Parse a MIDI note given as a number ("60") or a name ("C4", "F#3", "Bb-1").
///
/// Octaves follow the C4 = 60 convention.
pub fn parse_note(s: &str) -> Result<u8, String> {
    let s = s.trim();
    if let Ok(number) = s.parse::<u8>() {
        return if number <= 127 {
            Ok(number)
        } else {
            Err(format!("note {number} is out of range (0-127)"))
        };
    }

    let mut chars = s.chars();
    let pitch_class: i32 = match chars.next().map(|c| c.to_ascii_uppercase()) {
        Some('C') => 0,
        Some('D') => 2,
        Some('E') => 4,
        Some('F') => 5,
        Some('G') => 7,
        Some('A') => 9,
        Some('B') => 11,
        _ => return Err(format!("invalid note '{s}' (expected 0-127 or a name like C4)")),
    };
    let rest = chars.as_str();
    let (accidental, octave) = if let Some(o) = rest.strip_prefix('#') {
        (1, o)
    } else if let Some(o) = rest.strip_prefix('b') {
        (-1, o)
    } else {
        (0, rest)
    };
    let octave: i32 = octave
        .parse()
        .map_err(|_| format!("invalid octave in note '{s}'"))?;

    let note = (octave + 1) * 12 + pitch_class + accidental;
    u8::try_from(note)
        .ok()
        .filter(|n| *n <= 127)
        .ok_or_else(|| format!("note '{s}' is out of range (0-127)"))
}

/// Load `path` if given and write its values into `store`.
pub fn load_preset(store: &ParamStore, path: Option<&Path>) -> anyhow::Result<Option<Preset>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let preset = Preset::load(path)
        .with_context(|| format!("failed to load preset {}", path.display()))?;
    preset
        .apply(store)
        .with_context(|| format!("preset '{}' does not fit this instrument", preset.name))?;
    tracing::info!(name = %preset.name, path = %path.display(), "loaded preset");
    Ok(Some(preset))
}

/// Apply `id=value` overrides in order.
pub fn apply_overrides(store: &ParamStore, assignments: &[String]) -> anyhow::Result<()> {
    for assignment in assignments {
        let param = store
            .assign(assignment)
            .with_context(|| format!("invalid --set '{assignment}'"))?;
        tracing::debug!(id = param.id(), value = store.get(param), "override");
    }
    Ok(())
}
