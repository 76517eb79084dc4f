//! Storage seam for books.

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{Book, BookDraft, BookId};

/// Storage for books, shared by every request handler.
///
/// Implementations must make `create`, `replace` and `delete` atomic with
/// respect to each other: ids are unique for the lifetime of the store.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books in insertion order
    async fn list(&self) -> anyhow::Result<Vec<Book>>;

    async fn get(&self, id: BookId) -> anyhow::Result<Option<Book>>;

    /// Whether a book is stored under `id`
    async fn exists(&self, id: BookId) -> anyhow::Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Store a new book under a freshly assigned id
    async fn create(&self, draft: BookDraft) -> anyhow::Result<Book>;

    /// Replace the book stored under `id`, keeping its position.
    /// Returns `None` when no such book exists.
    async fn replace(&self, id: BookId, draft: BookDraft) -> anyhow::Result<Option<Book>>;

    /// Remove the book stored under `id`. Returns whether it existed.
    async fn delete(&self, id: BookId) -> anyhow::Result<bool>;

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.list().await?.len())
    }
}

/// Process-local store; contents vanish with the process.
pub struct InMemoryBookRepository {
    shelf: RwLock<Shelf>,
}

struct Shelf {
    books: Vec<Book>,
    next_id: BookId,
}

impl Shelf {
    fn position(&self, id: BookId) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self {
            shelf: RwLock::new(Shelf {
                books: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list(&self) -> anyhow::Result<Vec<Book>> {
        Ok(self.shelf.read().await.books.clone())
    }

    async fn get(&self, id: BookId) -> anyhow::Result<Option<Book>> {
        let shelf = self.shelf.read().await;
        Ok(shelf.books.iter().find(|book| book.id == id).cloned())
    }

    async fn exists(&self, id: BookId) -> anyhow::Result<bool> {
        Ok(self.shelf.read().await.position(id).is_some())
    }

    async fn create(&self, draft: BookDraft) -> anyhow::Result<Book> {
        let mut shelf = self.shelf.write().await;

        let id = shelf.next_id;
        shelf.next_id = id
            .checked_add(1)
            .ok_or_else(|| anyhow!("book id space exhausted"))?;

        let book = draft.into_book(id);
        shelf.books.push(book.clone());
        Ok(book)
    }

    async fn replace(&self, id: BookId, draft: BookDraft) -> anyhow::Result<Option<Book>> {
        let mut shelf = self.shelf.write().await;

        let Some(index) = shelf.position(id) else {
            return Ok(None);
        };

        let book = draft.into_book(id);
        shelf.books[index] = book.clone();
        Ok(Some(book))
    }

    async fn delete(&self, id: BookId) -> anyhow::Result<bool> {
        let mut shelf = self.shelf.write().await;

        match shelf.position(id) {
            Some(index) => {
                shelf.books.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.shelf.read().await.books.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn draft(title: &str) -> BookDraft {
        BookDraft {
            title: title.to_string(),
            author: "Anon".to_string(),
            published_year: None,
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let repo = InMemoryBookRepository::new();

        let first = repo.create(draft("A")).await.unwrap();
        let second = repo.create(draft("B")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryBookRepository::new();

        let first = repo.create(draft("A")).await.unwrap();
        let second = repo.create(draft("B")).await.unwrap();
        assert!(repo.delete(second.id).await.unwrap());
        assert!(repo.delete(first.id).await.unwrap());

        let third = repo.create(draft("C")).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let repo = InMemoryBookRepository::new();
        for title in ["A", "B", "C"] {
            repo.create(draft(title)).await.unwrap();
        }

        let titles: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect();
        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn replace_keeps_id_and_position() {
        let repo = InMemoryBookRepository::new();
        repo.create(draft("A")).await.unwrap();
        let target = repo.create(draft("B")).await.unwrap();
        repo.create(draft("C")).await.unwrap();

        let updated = repo
            .replace(
                target.id,
                BookDraft {
                    title: "B2".to_string(),
                    author: "Someone".to_string(),
                    published_year: Some(2001),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, target.id);
        let books = repo.list().await.unwrap();
        assert_eq!(books[1], updated);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn exists_tracks_create_and_delete() {
        let repo = InMemoryBookRepository::new();
        let book = repo.create(draft("A")).await.unwrap();

        assert!(repo.exists(book.id).await.unwrap());
        assert!(!repo.exists(book.id + 1).await.unwrap());

        repo.delete(book.id).await.unwrap();
        assert!(!repo.exists(book.id).await.unwrap());
    }

    #[tokio::test]
    async fn missing_ids_are_reported() {
        let repo = InMemoryBookRepository::new();

        assert!(repo.get(7).await.unwrap().is_none());
        assert!(!repo.exists(7).await.unwrap());
        assert!(repo.replace(7, draft("X")).await.unwrap().is_none());
        assert!(!repo.delete(7).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_unique_ids() {
        let repo = Arc::new(InMemoryBookRepository::new());

        let tasks: Vec<_> = (0..64)
            .map(|n| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(draft(&n.to_string())).await.unwrap().id })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 64);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&64));
    }
}
