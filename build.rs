use std::env;

fn main() {
    // Default key bindings baked into the firmware image.
    // These are used whenever the EEPROM holds no valid settings generation.
    //
    // Each value is a 16-bit register word: high byte = modifier mask,
    // low byte = key code (e.g. "0x0056" = Keypad -, no modifiers).

    // Counter-clockwise rotation (default: Keypad -)
    emit_binding("ROTARY_CCW_KEY", "0x0056");

    // Clockwise rotation (default: Keypad +)
    emit_binding("ROTARY_CW_KEY", "0x0057");

    // Push button (default: Keypad =)
    emit_binding("ROTARY_BTN_KEY", "0x0067");
}

fn emit_binding(name: &str, default: &str) {
    match env::var(name) {
        Ok(value) if parse_word(&value).is_some() => {
            println!("cargo:rustc-env={}={}", name, value.trim());
            println!("cargo:warning=Using {} from environment: {}", name, value.trim());
        }
        Ok(value) => {
            println!(
                "cargo:warning=Ignoring {}={} (expected a 16-bit hex word), using {}",
                name, value, default
            );
            println!("cargo:rustc-env={}={}", name, default);
        }
        Err(_) => {
            println!("cargo:rustc-env={}={}", name, default);
        }
    }

    // Rerun if environment variable changes
    println!("cargo:rerun-if-env-changed={}", name);
}

fn parse_word(value: &str) -> Option<u16> {
    let value = value.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))?;
    if digits.is_empty() || digits.len() > 4 {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}
