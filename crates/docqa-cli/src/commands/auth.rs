//! Authentication commands: register, login (with the OTP handshake),
//! and logout.

use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;

use docqa_application::SessionGate;
use docqa_core::session::AuthStatus;

pub async fn register(gate: &SessionGate, email: &str, password: &str) -> Result<()> {
    match gate.auth().register(email, password).await {
        Ok(notice) => {
            println!("{}", notice.green());
            complete_otp(gate).await
        }
        Err(err) => {
            eprintln!("{}", err.user_message().red());
            Ok(())
        }
    }
}

pub async fn login(gate: &SessionGate, email: &str, password: &str) -> Result<()> {
    match gate.auth().login(email, password).await {
        Ok(AuthStatus::Authenticated) => {
            println!("{}", "Login successful!".green());
            Ok(())
        }
        Ok(AuthStatus::OtpPending) => {
            println!(
                "{}",
                "Email not verified yet. A verification code was sent to your inbox.".yellow()
            );
            complete_otp(gate).await
        }
        Ok(_) => Ok(()),
        Err(err) => {
            eprintln!("{}", err.user_message().red());
            Ok(())
        }
    }
}

pub async fn logout(gate: &SessionGate) -> Result<()> {
    gate.auth().logout().await?;
    println!("Logged out.");
    Ok(())
}

/// Prompts for the one-time passcode until verification (and the
/// follow-up auto-login) succeeds or the user gives up. A failed
/// auto-login keeps the pending credentials, so retrying here never asks
/// for the password again.
async fn complete_otp(gate: &SessionGate) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!(
        "{}",
        "Enter the verification code (\"resend\" for a new one, empty line to abort).".dimmed()
    );

    loop {
        let line = match rl.readline("otp> ") {
            Ok(line) => line,
            Err(_) => return Ok(()),
        };
        let code = line.trim();

        if code.is_empty() {
            println!("Aborted. Run `docqa login` to continue later.");
            return Ok(());
        }

        if code.eq_ignore_ascii_case("resend") {
            match gate.auth().resend_otp().await {
                Ok(()) => println!("A new code is on its way."),
                Err(err) => eprintln!("{}", err.user_message().red()),
            }
            continue;
        }

        match gate.auth().verify_otp(code).await {
            Ok(()) => {
                println!("{}", "Login successful!".green());
                return Ok(());
            }
            Err(err) => {
                eprintln!("{}", err.user_message().red());
                // Anything other than the recoverable retry path means the
                // handshake is over for this invocation.
                if gate.status().await != AuthStatus::OtpPending {
                    return Ok(());
                }
            }
        }
    }
}
