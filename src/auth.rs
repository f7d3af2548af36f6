use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "PASSCRYPT_PASSWORD";

/// Reads the password from, in order: `PASSCRYPT_PASSWORD`, the first line of
/// piped stdin (only when stdin is not needed for the payload), or a TTY prompt.
///
/// With `confirm`, the TTY prompt asks twice.
pub fn read_password(stdin_is_payload: bool, confirm: bool) -> Result<Zeroizing<String>> {
    //  PASSCRYPT_PASSWORD="supersecret" passcrypt encrypt "hello"
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    //  echo "supersecret" | passcrypt encrypt "hello"
    if !io::stdin().is_terminal() {
        if stdin_is_payload {
            bail!("no password provided; set {PASSWORD_ENV} when piping data on stdin");
        }

        let mut buf = Zeroizing::new(String::new());
        io::stdin().lock().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
        bail!("no password provided");
    }

    let pw = Zeroizing::new(rpassword::prompt_password("Password: ")?);
    if pw.is_empty() {
        bail!("password cannot be empty");
    }

    if confirm {
        let again = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);
        if *pw != *again {
            bail!("passwords do not match");
        }
    }

    Ok(pw)
}

pub fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
