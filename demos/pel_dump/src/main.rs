use std::env;

use gradnet::{pels, prelude::*};

/// Decodes a bitmap into a flat numeric pel file usable as training input.
fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let (image_path, out_path) = match args.as_slice() {
        [_, image_path, out_path] => (image_path, out_path),
        _ => {
            eprintln!("usage: pel_dump <image> <out.txt>");
            return Ok(());
        }
    };

    let values = pels::load_intensities(image_path)?;
    pels::write_pel_file(out_path, &values)?;

    println!("{} pels written to {out_path}", values.len());
    Ok(())
}
