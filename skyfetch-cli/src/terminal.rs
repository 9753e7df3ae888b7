//! Plain-text rendering surface for the terminal.

use std::io::{self, Write};

use skyfetch_core::{
    DisplayCommand, DisplaySink, Units,
    model::display_temperature,
};

/// Writes each display command as human-readable lines.
pub struct TerminalSurface<W: Write> {
    out: W,
    units: Units,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout(units: Units) -> Self {
        Self::new(io::stdout(), units)
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, units: Units) -> Self {
        Self { out, units }
    }

    fn write(&mut self, command: DisplayCommand) -> io::Result<()> {
        let symbol = self.units.symbol();
        match command {
            DisplayCommand::Welcome => {
                writeln!(self.out, "🌤️  Welcome to SkyFetch")?;
                writeln!(self.out, "Enter a city name to get started!")?;
            }
            DisplayCommand::Loading => writeln!(self.out, "Loading weather data...")?,
            DisplayCommand::Weather { current, forecast } => {
                writeln!(self.out)?;
                writeln!(self.out, "{}", current.city)?;
                writeln!(
                    self.out,
                    "  {}{symbol}  {}",
                    display_temperature(current.temperature),
                    current.description
                )?;

                if !forecast.is_empty() {
                    writeln!(self.out)?;
                    writeln!(self.out, "5-Day Forecast")?;
                    for day in &forecast {
                        writeln!(
                            self.out,
                            "  {:<4} {:>4}{symbol}  {}",
                            day.weekday(),
                            display_temperature(day.temperature),
                            day.description
                        )?;
                    }
                }
                writeln!(self.out)?;
            }
            DisplayCommand::Error(message) => {
                writeln!(self.out, "⚠️  Oops!")?;
                writeln!(self.out, "{message}")?;
            }
            DisplayCommand::RecentSearches(cities) => {
                if !cities.is_empty() {
                    let chips: Vec<String> = cities
                        .iter()
                        .enumerate()
                        .map(|(i, city)| format!("[{}] {city}", i + 1))
                        .collect();
                    writeln!(self.out, "Recent: {}", chips.join("  "))?;
                }
            }
            DisplayCommand::SubmitEnabled(_)
            | DisplayCommand::ClearInput
            | DisplayCommand::FocusInput => {}
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for TerminalSurface<W> {
    fn apply(&mut self, command: DisplayCommand) {
        if let Err(e) = self.write(command) {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }
}
