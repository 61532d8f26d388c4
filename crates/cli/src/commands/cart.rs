//! Cart, checkout and order history.

use shopcart_core::{CartItem, ItemId};
use shopcart_storefront::pages::{CartPage, ConfirmationPage, OrderHistoryPage, PageOutcome};
use shopcart_storefront::{Route, Storefront};

use super::{CliError, enter, finish};

/// Enter the cart view and load it.
async fn open(storefront: &Storefront) -> Result<CartPage, CliError> {
    enter(storefront, Route::Cart)?;
    let mut page = CartPage::open(storefront);
    let outcome = page.load().await;
    finish(outcome, page.error())?;
    Ok(page)
}

#[allow(clippy::print_stdout)]
fn print_line(line: &CartItem) {
    println!(
        "{:>6}  {:>3} x {:>10}  {:>10}  {}",
        line.id.to_string(),
        line.quantity.to_string(),
        line.price.to_string(),
        line.line_total().to_string(),
        line.name
    );
}

#[allow(clippy::print_stdout)]
fn print_cart(page: &CartPage) {
    match page.cart() {
        Some(cart) if !cart.is_empty() => {
            cart.items.iter().for_each(print_line);
            println!(
                "{} item(s), total {}",
                page.total_quantity(),
                page.total_price()
            );
        }
        _ => println!("Your cart is empty"),
    }
}

pub async fn show(storefront: &Storefront) -> Result<(), CliError> {
    let page = open(storefront).await?;
    print_cart(&page);
    Ok(())
}

pub async fn remove(storefront: &Storefront, id: ItemId) -> Result<(), CliError> {
    let mut page = open(storefront).await?;
    let outcome = page.remove_item(id).await;
    finish(outcome, page.error())?;
    print_cart(&page);
    Ok(())
}

pub async fn cleanup(storefront: &Storefront) -> Result<(), CliError> {
    let mut page = open(storefront).await?;
    let outcome = page.merge_duplicates().await;
    finish(outcome, page.error())?;
    print_cart(&page);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn checkout(storefront: &Storefront) -> Result<(), CliError> {
    let mut page = open(storefront).await?;

    let outcome = page.checkout().await;
    if outcome != PageOutcome::Redirected(Route::OrderConfirmation) {
        finish(outcome, page.error())?;
        return Err(CliError::Page("No order was placed".to_string()));
    }

    let Some(confirmation) = ConfirmationPage::open(storefront, page.take_order()) else {
        return Err(CliError::Page("No order was placed".to_string()));
    };
    let order = confirmation.order();
    println!("Order #{} placed ({})", order.order_id, order.status);
    order.items.iter().for_each(print_line);
    println!(
        "{} item(s), total {}",
        confirmation.total_quantity(),
        confirmation.total_price()
    );
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn orders(storefront: &Storefront) -> Result<(), CliError> {
    enter(storefront, Route::Orders)?;
    let mut page = OrderHistoryPage::open(storefront);
    let outcome = page.load().await;
    finish(outcome, page.error())?;

    if page.orders().is_empty() {
        println!("No orders yet");
        return Ok(());
    }
    for record in page.orders() {
        println!(
            "Order #{}  {}  {} line(s)  {}",
            record.id,
            record.placed_on().unwrap_or_else(|| "-".to_string()),
            record.items.len(),
            record.total_price()
        );
    }
    Ok(())
}
