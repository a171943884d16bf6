// crates/vf_runtime/src/queue.rs

//! 有界并发队列
//!
//! 扇出/扇入调度的核心原语：生产者按值投递，消费者按值取走，
//! 队列中的元素始终只有一个所有者。
//!
//! # 语义
//!
//! - `push`: 队列满时阻塞；收到结束信号后返回 [`VfError::QueueFinished`]
//! - `pop(n)`: 队列空且未结束时阻塞；结束后返回空向量（调用方视为
//!   良性重试/退出信号，不是错误）
//! - `pop_all`: 阻塞等待至少一个元素，随后清空队列返回
//! - `notify_finished`: 幂等，唤醒所有等待者
//!
//! # 示例
//!
//! ```
//! use vf_runtime::BoundedBuffer;
//!
//! let queue: BoundedBuffer<i32> = BoundedBuffer::new(4);
//! queue.push(1).unwrap();
//! queue.push(2).unwrap();
//! assert_eq!(queue.pop(1), vec![1]);
//! assert_eq!(queue.pop_all(), vec![2]);
//! queue.notify_finished();
//! assert!(queue.push(3).is_err());
//! assert!(queue.pop(1).is_empty());
//! ```

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use vf_foundation::{VfError, VfResult};

struct Inner<T> {
    items: VecDeque<T>,
    finished: bool,
}

/// 有界并发队列
///
/// 基于互斥锁 + 条件变量的经典有界缓冲，容量在构造时固定。
pub struct BoundedBuffer<T> {
    capacity: usize,
    inner: Mutex<Inner<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> BoundedBuffer<T> {
    /// 创建容量为 `capacity` 的队列
    ///
    /// 容量 0 会被抬升为 1，保证 `push` 不会永久阻塞。
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                finished: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// 队列容量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前元素数
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    /// 是否已收到结束信号
    pub fn is_finished(&self) -> bool {
        self.inner.lock().finished
    }

    /// 投递一个元素，队列满时阻塞
    ///
    /// 结束信号到达后拒绝投递并返回 [`VfError::QueueFinished`]。
    pub fn push(&self, item: T) -> VfResult<()> {
        let mut guard = self.inner.lock();
        while guard.items.len() >= self.capacity && !guard.finished {
            self.not_full.wait(&mut guard);
        }
        if guard.finished {
            return Err(VfError::QueueFinished);
        }
        guard.items.push_back(item);
        self.not_empty.notify_one();
        Ok(())
    }

    /// 取走至多 `n` 个元素，队列空且未结束时阻塞
    ///
    /// 返回空向量当且仅当队列已结束且为空。
    pub fn pop(&self, n: usize) -> Vec<T> {
        let mut guard = self.inner.lock();
        while guard.items.is_empty() && !guard.finished {
            self.not_empty.wait(&mut guard);
        }
        let count = n.min(guard.items.len());
        let items: Vec<T> = guard.items.drain(..count).collect();
        if !items.is_empty() {
            self.not_full.notify_all();
        }
        items
    }

    /// 清空队列并返回所有元素
    ///
    /// 队列空且未结束时阻塞等待第一个元素；结束后立即返回（可能为空）。
    pub fn pop_all(&self) -> Vec<T> {
        let mut guard = self.inner.lock();
        while guard.items.is_empty() && !guard.finished {
            self.not_empty.wait(&mut guard);
        }
        let items: Vec<T> = guard.items.drain(..).collect();
        if !items.is_empty() {
            self.not_full.notify_all();
        }
        items
    }

    /// 发出结束信号并唤醒所有等待者，幂等
    pub fn notify_finished(&self) {
        let mut guard = self.inner.lock();
        guard.finished = true;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_push_pop_order() {
        let queue = BoundedBuffer::new(8);
        for v in 0..5 {
            queue.push(v).unwrap();
        }
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.pop(2), vec![0, 1]);
        assert_eq!(queue.pop_all(), vec![2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_finished_semantics() {
        let queue: BoundedBuffer<i32> = BoundedBuffer::new(2);
        queue.push(1).unwrap();
        queue.notify_finished();
        assert!(matches!(queue.push(2), Err(VfError::QueueFinished)));
        // 结束后仍可取走已有元素
        assert_eq!(queue.pop(4), vec![1]);
        // 空 + 结束 => 立即返回空向量
        assert!(queue.pop(1).is_empty());
        assert!(queue.pop_all().is_empty());
    }

    #[test]
    fn test_zero_capacity_lifted() {
        let queue: BoundedBuffer<()> = BoundedBuffer::new(0);
        assert_eq!(queue.capacity(), 1);
        queue.push(()).unwrap();
    }

    #[test]
    fn test_blocking_producer_consumer() {
        // 容量远小于元素数：生产者必须被消费端推进
        let queue = Arc::new(BoundedBuffer::new(2));
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for v in 0..100 {
                    queue.push(v).unwrap();
                }
            })
        };

        let mut seen = Vec::new();
        while seen.len() < 100 {
            let mut batch = queue.pop_all();
            seen.append(&mut batch);
        }
        producer.join().unwrap();
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_pop_unblocks_on_finish() {
        let queue: Arc<BoundedBuffer<i32>> = Arc::new(BoundedBuffer::new(1));
        let waiter = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop(1))
        };
        queue.notify_finished();
        assert!(waiter.join().unwrap().is_empty());
    }
}
