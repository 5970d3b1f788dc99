use std::collections::VecDeque;

use crate::types::Gesture;

/// Ventana deslizante de las últimas clasificaciones crudas.
/// FIFO con capacidad fija: al superar la capacidad se descarta la más antigua.
#[derive(Debug, Clone)]
pub struct GestureHistory {
    buffer: VecDeque<Gesture>,
    capacity: usize,
}

impl GestureHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Añade una clasificación al final de la ventana
    pub fn push(&mut self, gesture: Gesture) {
        self.buffer.push_back(gesture);

        if self.buffer.len() > self.capacity {
            self.buffer.pop_front();
        }
    }

    /// Número de entradas iguales a `gesture` (incluye `Gesture::None`)
    pub fn count(&self, gesture: Gesture) -> usize {
        self.buffer.iter().filter(|&&g| g == gesture).count()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_empty_initially() {
        let history = GestureHistory::new(8);
        assert!(history.is_empty());
        assert_eq!(history.count(Gesture::None), 0);
    }

    #[test]
    fn test_history_never_exceeds_capacity() {
        let mut history = GestureHistory::new(8);
        for i in 0..20 {
            history.push(Gesture::Pointing);
            assert_eq!(history.len(), (i + 1).min(8));
        }
        assert_eq!(history.count(Gesture::Pointing), 8);
    }

    #[test]
    fn test_sliding_window_evicts_oldest() {
        let mut history = GestureHistory::new(4);
        history.push(Gesture::FingerInMouth);
        history.push(Gesture::Pointing);
        history.push(Gesture::Pointing);
        history.push(Gesture::None);
        assert_eq!(history.count(Gesture::FingerInMouth), 1);

        // La quinta entrada expulsa la primera
        history.push(Gesture::None);
        assert_eq!(history.count(Gesture::FingerInMouth), 0);
        assert_eq!(history.count(Gesture::Pointing), 2);
        assert_eq!(history.count(Gesture::None), 2);

        // La siguiente expulsa una de las dos Pointing
        history.push(Gesture::None);
        assert_eq!(history.count(Gesture::Pointing), 1);
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut history = GestureHistory::new(0);
        history.push(Gesture::Pointing);
        history.push(Gesture::None);
        assert_eq!(history.len(), 1);
        assert_eq!(history.count(Gesture::None), 1);
    }

    #[test]
    fn test_clear() {
        let mut history = GestureHistory::new(3);
        history.push(Gesture::Pointing);
        history.clear();
        assert!(history.is_empty());
        for _ in 0..5 {
            history.push(Gesture::None);
        }
        assert_eq!(history.len(), 3);
    }
}
