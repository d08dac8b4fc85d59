use aeolus::Scene;
use aeolus::model;
use aeolus::optdata::ComponentStore;
use aeolus::wavelength;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: aeolus <scene.json>")?;

    let scene = Scene::from_file(&path)?;
    let store = ComponentStore::from_source(scene.source())?;
    let output = model::run(&scene, &store)?;

    println!(
        "Evaluated {} layers at {} wavelengths (components from {})",
        output.layers.len(),
        scene.wavelengths().len(),
        store.dir().display()
    );

    let surface = output.surface();
    println!(
        "{:>8} {:>12} {:>8} {:>8} {:>12}",
        "wl [um]", "ext [1/km]", "SSA", "g", "column AOD"
    );
    for &wl in scene.wavelengths() {
        println!(
            "{:>8.3} {:>12.6} {:>8.4} {:>8.4} {:>12.6}",
            wavelength::um_from_nm(wl),
            surface.extinction[&wl],
            surface.ssa[&wl],
            surface.asymmetry[&wl],
            output.column_aod[&wl],
        );
    }

    Ok(())
}
