use crate::normalize_degrees;

pub trait Mean<T> {
    fn mean(self) -> Option<T>;
}

macro_rules! float_mean {
    ($($num:ty)*) => ($(
        impl<I> Mean<$num> for I
        where
            I: Iterator<Item = $num>
        {
            fn mean(mut self) -> Option<$num> {
                let first = self.next()?;
                let (sum, count) = self.fold((first, 1), |(sum, count), next| {
                    (sum + next, count + 1)
                });
                Some(sum / count as $num)
            }
        }
    )*)
}

float_mean! { f32 f64 }

/// Vector average of angles in degrees. Angular data wraps, so `{350, 10}` averages to 0 and
/// not to 180 as an arithmetic mean would.
pub trait CircularMean {
    fn circular_mean(self) -> Option<f64>;
}

impl<I> CircularMean for I
where
    I: Iterator<Item = f64>,
{
    fn circular_mean(self) -> Option<f64> {
        let (sin, cos, count) = self.fold((0., 0., 0_usize), |(sin, cos, count), degrees| {
            let radians = degrees.to_radians();
            (sin + radians.sin(), cos + radians.cos(), count + 1)
        });

        if count == 0 {
            return None;
        }

        // Opposing headings cancel out and leave no dominant direction
        let resultant = (sin * sin + cos * cos).sqrt() / count as f64;
        if resultant < 1e-9 {
            None
        } else {
            Some(normalize_degrees(sin.atan2(cos).to_degrees()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_empty_iterator_is_none() {
        assert_eq!(std::iter::empty::<f64>().mean(), None);
        assert_eq!([1.0_f64, 2., 6.].into_iter().mean(), Some(3.));
    }

    #[test]
    fn test_circular_mean_wraps_around_north() {
        let mean = [350.0_f64, 10.].into_iter().circular_mean().unwrap();
        let distance_from_north = mean.min(360. - mean);
        assert!(distance_from_north < 1e-6, "{mean}");
    }

    #[test]
    fn test_circular_mean_of_opposites_is_none() {
        assert_eq!([90.0_f64, 270.].into_iter().circular_mean(), None);
    }
}
