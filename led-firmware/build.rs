// Build-Script: Linker-Konfiguration für ESP32-C6
//
// Keine Build-Zeit-Variablen nötig: die komplette Board-Konfiguration
// steht als Konstanten in src/config.rs.

fn main() {
    linker_hints();

    // defmt Log-Symbole
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    // ESP32 Memory-Layout + Startup-Code (muss zuletzt kommen)
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

// Wird vom Linker als "--error-handling-script" erneut aufgerufen und gibt
// Hinweise zu fehlenden Linker-Skripten aus
fn linker_hints() {
    let args: Vec<String> = std::env::args().collect();

    if let [_, kind, what, ..] = args.as_slice() {
        if kind != "undefined-symbol" {
            std::process::exit(1);
        }

        if what.starts_with("_defmt_") {
            eprintln!();
            eprintln!(
                "💡 `defmt` Symbole fehlen - ist `defmt.x` eingebunden und `use esp_println as _;` gesetzt?"
            );
            eprintln!();
        } else if what == "_stack_start" {
            eprintln!();
            eprintln!("💡 Linker-Skript `linkall.x` fehlt?");
            eprintln!();
        }

        std::process::exit(0);
    }

    match std::env::current_exe() {
        Ok(exe) => println!(
            "cargo:rustc-link-arg=--error-handling-script={}",
            exe.display()
        ),
        Err(e) => println!("cargo:warning=Linker-Hinweise deaktiviert: {e}"),
    }
}
