//! Catalog and product views.

use shopcart_core::ItemId;
use shopcart_storefront::pages::{CatalogPage, PageOutcome, ProductPage};
use shopcart_storefront::{Route, StoreError, Storefront};

use super::{CliError, enter, finish};

#[allow(clippy::print_stdout)]
pub async fn items(storefront: &Storefront) -> Result<(), CliError> {
    enter(storefront, Route::Products)?;
    let mut page = CatalogPage::open(storefront);
    let outcome = page.load().await;
    finish(outcome, page.error())?;

    if page.items().is_empty() {
        println!("No items available");
        return Ok(());
    }
    for item in page.items() {
        println!(
            "{:>6}  {:>10}  {} ({})",
            item.id.to_string(),
            item.price.to_string(),
            item.name,
            item.brand
        );
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn item(storefront: &Storefront, id: ItemId) -> Result<(), CliError> {
    enter(storefront, Route::Product(id))?;
    let mut page = ProductPage::open(storefront, id);
    let outcome = page.load().await;
    finish(outcome, page.error())?;

    if let Some(item) = page.item() {
        println!("{}", item.name);
        println!("  {} / {}", item.brand, item.category);
        println!("  {}", item.price);
        if !item.description.is_empty() {
            println!("  {}", item.description);
        }
        println!("  {}", item.primary_image());
    }
    Ok(())
}

/// Add `quantity` of an item to the cart.
///
/// Signed out, this records the product as the redirect intent and fails;
/// the next `shopcart login` comes back to it.
#[allow(clippy::print_stdout)]
pub async fn add(storefront: &Storefront, id: ItemId, quantity: u32) -> Result<(), CliError> {
    enter(storefront, Route::Product(id))?;
    let mut page = ProductPage::open(storefront, id);
    page.set_quantity(quantity).map_err(StoreError::from)?;

    let outcome = page.add_to_cart().await;
    finish(outcome, page.error())?;
    if outcome == PageOutcome::Completed {
        println!("Added {quantity} x item {id} to your cart");
    }
    Ok(())
}
