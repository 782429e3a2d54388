use color_eyre::Result;

use crate::cli::TokenCmd;
use crate::output::mask_token;
use crate::runtime::Runtime;

pub fn run(action: TokenCmd, rt: &Runtime) -> Result<()> {
    match action {
        TokenCmd::Set { token } => {
            rt.tokens.save(&token)?;
            println!("token stored in {}", rt.token_path.display());
        }
        TokenCmd::Show => match rt.tokens.load()? {
            Some(token) => println!("{}", mask_token(&token)),
            None => println!("no token stored ({})", rt.token_path.display()),
        },
        TokenCmd::Clear => {
            rt.tokens.clear()?;
            println!("token removed");
        }
    }
    Ok(())
}
