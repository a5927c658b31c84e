use forecast_core::{ForecastService, Stage, WeatherQuery};
use inquire::{Confirm, InquireError, Text};
use std::io::{self, Write};
use tracing::debug;

/// One round of answers, exactly as typed.
#[derive(Debug, Clone)]
pub struct Answers {
    pub city: String,
    pub unit: String,
    pub days: String,
}

/// Prompt until the user declines another lookup or cancels a prompt.
pub async fn run(service: &ForecastService) -> anyhow::Result<()> {
    loop {
        let answers = match prompt_answers() {
            Ok(answers) => answers,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        run_round(service, &answers, &mut io::stdout()).await?;

        match Confirm::new("Look up another city?").with_default(false).prompt() {
            Ok(true) => continue,
            Ok(false)
            | Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn prompt_answers() -> Result<Answers, InquireError> {
    let city = Text::new("Enter city name >>").prompt()?;
    let unit = Text::new("Enter unit of temperature (C or F) >>").with_default("C").prompt()?;
    let days = Text::new("Enter number of days to forecast (1-10) >>").with_default("3").prompt()?;

    Ok(Answers { city, unit, days })
}

/// Validate, look up and print. Request failures are written to `out`;
/// only a failing writer is an error here.
pub async fn run_round<W: Write>(
    service: &ForecastService,
    answers: &Answers,
    out: &mut W,
) -> io::Result<()> {
    let query = match WeatherQuery::parse(
        Some(answers.city.as_str()),
        Some(answers.unit.as_str()),
        Some(answers.days.as_str()),
    ) {
        Ok(query) => query,
        Err(e) => {
            debug!(stage = %Stage::Validating, error = %e, "rejected answers");
            return writeln!(out, "Invalid input: {e}");
        }
    };

    match service.report(&query).await {
        Ok(report) => writeln!(out, "\n{}\n", report.summary),
        Err(e) => writeln!(out, "{e}"),
    }
}
