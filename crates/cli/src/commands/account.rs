//! Sign-up, sign-in and sign-out.

use shopcart_storefront::pages::{LoginPage, NavBar, PageOutcome, SignupPage};
use shopcart_storefront::{Route, Storefront};

use super::{CliError, finish};

/// Sign in, then show the view the user was turned back from.
#[allow(clippy::print_stdout)]
pub async fn login(storefront: &Storefront, username: &str, password: &str) -> Result<(), CliError> {
    storefront.navigator().navigate(Route::Login);
    let mut page = LoginPage::open(storefront);

    match page.submit(username, password).await {
        PageOutcome::Redirected(route) if route != Route::Login => {
            println!("Signed in as {username}");
            if route == Route::Home {
                return Ok(());
            }
            println!("Resuming {route}");
            super::show(storefront, route).await
        }
        outcome => finish(outcome, page.error()),
    }
}

#[allow(clippy::print_stdout)]
pub async fn signup(
    storefront: &Storefront,
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(), CliError> {
    storefront.navigator().navigate(Route::Signup);
    let mut page = SignupPage::open(storefront);

    match page.submit(username, password, confirm).await {
        PageOutcome::Redirected(Route::Home) => {
            println!("Account created, signed in as {username}");
            Ok(())
        }
        PageOutcome::Redirected(Route::Login) => {
            println!("Account created for {username}");
            prompt(Route::Login);
            Ok(())
        }
        outcome => finish(outcome, page.error()),
    }
}

#[allow(clippy::print_stdout)]
pub fn logout(storefront: &Storefront) -> Result<(), CliError> {
    let nav = NavBar::new(storefront);
    let was = nav.username();
    nav.sign_out()?;
    match was {
        Some(username) => println!("Signed out {username}"),
        None => println!("Not signed in"),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn whoami(storefront: &Storefront) {
    match NavBar::new(storefront).username() {
        Some(username) => println!("{username}"),
        None => println!("Not signed in"),
    }
}

/// Tell the user which command fills in a form view.
#[allow(clippy::print_stdout)]
pub(crate) fn prompt(route: Route) {
    match route {
        Route::Signup => println!("Create an account with `shopcart signup`"),
        _ => println!("Sign in with `shopcart login`"),
    }
}
