//! Constellation — landing page animation. Runs the landing_fx app.

use landing_fx::prelude::*;

fn main() {
    let _ = dotenvy::dotenv();

    LandingFxBuilder::new().env_config().build().run();
}
