mod common;

use common::TestLibrary;
use library_lending::adapters::json::JsonRepositories;
use library_lending::application::catalog::{self, CatalogError, NewItem};
use library_lending::domain::{Item, ItemKind, Session};
use library_lending::ports::*;

async fn admin_session(library: &TestLibrary) -> Session {
    let admin = library.add_admin("Admin", "admin@test.com").await;
    Session::for_user(&admin).unwrap()
}

async fn add_cd(library: &TestLibrary, title: &str, artist: &str, genre: &str) -> Item {
    let mut cd = Item::new(ItemKind::Cd, title, artist, library.now()).with_genre(genre);
    library.deps.catalog.save(&mut cd).await.unwrap();
    cd
}

// ============================================================================
// add_item
// ============================================================================

#[tokio::test]
async fn test_add_book_with_isbn() {
    // Arrange
    let library = TestLibrary::new().await;
    let session = admin_session(&library).await;

    // Act
    let book = catalog::add_item(
        &library.deps,
        &session,
        NewItem::new(ItemKind::Book, " Clean Code ", "Robert Martin")
            .isbn("978-1-234-56789-7")
            .genre("Software"),
    )
    .await
    .unwrap();

    // Assert
    assert!(book.id.as_ref().unwrap().as_str().starts_with("BOOK_"));
    assert_eq!(book.title, "Clean Code");
    assert!(book.available);
    assert_eq!(book.isbn.as_deref(), Some("978-1-234-56789-7"));

    let reopened = JsonRepositories::open(library.data_dir()).await;
    assert_eq!(
        reopened
            .catalog
            .find(ItemKind::Book, book.id.as_ref().unwrap())
            .await,
        Some(book)
    );
}

#[tokio::test]
async fn test_add_item_validation() {
    let library = TestLibrary::new().await;
    let session = admin_session(&library).await;

    let cases = [
        (NewItem::new(ItemKind::Book, "Dune", "Herbert"), "missing isbn"),
        (
            NewItem::new(ItemKind::Book, "Dune", "Herbert").isbn("   "),
            "blank isbn",
        ),
        (
            NewItem::new(ItemKind::Book, "Dune", "Herbert").isbn("9781234567890"),
            "bad check digit",
        ),
        (
            NewItem::new(ItemKind::Cd, "Blue", "Miles").isbn("111"),
            "bad cd isbn",
        ),
    ];
    for (new_item, case) in cases {
        let result = catalog::add_item(&library.deps, &session, new_item).await;
        assert!(matches!(result, Err(CatalogError::InvalidIsbn)), "{}", case);
    }

    let result = catalog::add_item(
        &library.deps,
        &session,
        NewItem::new(ItemKind::Cd, "  ", "Miles"),
    )
    .await;
    assert!(matches!(result, Err(CatalogError::InvalidTitle)));

    let result =
        catalog::add_item(&library.deps, &session, NewItem::new(ItemKind::Cd, "Blue", "")).await;
    assert!(matches!(result, Err(CatalogError::InvalidCreator)));

    // CDはISBNなしでよい
    let cd = catalog::add_item(
        &library.deps,
        &session,
        NewItem::new(ItemKind::Cd, "Kind of Blue", "Miles Davis"),
    )
    .await
    .unwrap();
    assert!(cd.isbn.is_none());
    assert_eq!(catalog::list_items(&library.deps, ItemKind::Cd).await, vec![cd]);
    assert!(catalog::list_items(&library.deps, ItemKind::Book).await.is_empty());
}

#[tokio::test]
async fn test_add_item_requires_admin() {
    let library = TestLibrary::new().await;
    let member = library.add_user("Kamal", "kamal@test.com").await;
    let session = Session::for_user(&member).unwrap();

    let result = catalog::add_item(
        &library.deps,
        &session,
        NewItem::new(ItemKind::Cd, "Kind of Blue", "Miles Davis"),
    )
    .await;

    assert!(matches!(result, Err(CatalogError::NotAuthorized)));
    assert!(library.deps.catalog.find_all(ItemKind::Cd).await.is_empty());
}

// ============================================================================
// search
// ============================================================================

#[tokio::test]
async fn test_search_matches_title_creator_and_genre() {
    let library = TestLibrary::new().await;
    add_cd(&library, "Rock CD", "A", "Rock").await;
    add_cd(&library, "Another Rock", "A", "Rock").await;
    add_cd(&library, "Blue Train", "Coltrane", "Jazz").await;

    assert_eq!(
        catalog::search_items(&library.deps, ItemKind::Cd, "rock").await.len(),
        2
    );
    assert_eq!(
        catalog::search_items(&library.deps, ItemKind::Cd, "COLTRANE").await.len(),
        1
    );
    assert_eq!(
        catalog::search_items(&library.deps, ItemKind::Cd, "jaz").await.len(),
        1
    );
    // 空の検索語は全件
    assert_eq!(
        catalog::search_items(&library.deps, ItemKind::Cd, "").await.len(),
        3
    );
    assert!(
        catalog::search_items(&library.deps, ItemKind::Book, "rock")
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_search_books_by_isbn() {
    let library = TestLibrary::new().await;
    let mut book =
        Item::new(ItemKind::Book, "Java", "James", library.now()).with_isbn("9781234567897");
    library.deps.catalog.save(&mut book).await.unwrap();

    let found = catalog::search_items(&library.deps, ItemKind::Book, "1234567897").await;

    assert_eq!(found, vec![book]);
}

#[tokio::test]
async fn test_items_by_creator_and_genre() {
    let library = TestLibrary::new().await;
    add_cd(&library, "A1", "Queen", "Rock").await;
    add_cd(&library, "A2", "Queen", "Rock").await;
    add_cd(&library, "J1", "A", "Jazz").await;
    add_cd(&library, "J2", "B", "jazz").await;

    assert_eq!(
        catalog::items_by_creator(&library.deps, ItemKind::Cd, "Queen").await.len(),
        2
    );
    assert_eq!(
        catalog::items_by_creator(&library.deps, ItemKind::Cd, "queen").await.len(),
        2
    );
    assert!(
        catalog::items_by_creator(&library.deps, ItemKind::Cd, "Que")
            .await
            .is_empty()
    );
    assert_eq!(
        catalog::items_by_genre(&library.deps, ItemKind::Cd, "Jazz").await.len(),
        2
    );
    assert_eq!(
        catalog::items_by_genre(&library.deps, ItemKind::Cd, "Rock").await.len(),
        2
    );
}
