//! Quality-value based selection between client ranges and offered types

use std::cmp::Reverse;

use crate::accept::AcceptHeader;
use crate::media_type::{MediaType, Specificity};
use crate::quality::Quality;
use crate::result::NegotiationResult;

/// Fitness of a range against a concrete type, as computed by
/// [`MediaRangeMatcher::fitness_and_quality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitnessAndQuality {
	/// Higher is a closer match: 100 for the type, 10 for the subtype, 1 per
	/// matching parameter.
	pub fitness: u32,
	pub quality: Quality,
}

/// Ranks candidate media types against client ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaRangeMatcher;

impl MediaRangeMatcher {
	pub fn new() -> Self {
		Self
	}

	/// Selects the best candidate for an Accept header.
	///
	/// Each candidate takes its quality from the most specific range that
	/// matches it; a quality of 0 there rules the candidate out. Among the
	/// rest the winner has the highest `(quality, specificity, -index)`, so
	/// declaration order breaks the remaining ties.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_negotiation::{AcceptHeader, MediaRangeMatcher, MediaType};
	///
	/// let candidates = vec![
	///     MediaType::parse("text/html").unwrap(),
	///     MediaType::parse("application/json").unwrap(),
	/// ];
	/// let accept = AcceptHeader::parse("text/*;q=0, */*;q=0.1");
	/// let result = MediaRangeMatcher::new().best_match(&accept, &candidates);
	/// assert_eq!(result.media_type().unwrap().essence(), "application/json");
	/// ```
	pub fn best_match(&self, accept: &AcceptHeader, candidates: &[MediaType]) -> NegotiationResult {
		let ranges = accept.effective_ranges();
		let mut best: Option<((Quality, Specificity, Reverse<usize>), usize, usize)> = None;

		for (candidate_index, candidate) in candidates.iter().enumerate() {
			let Some(range_index) = most_specific_range(&ranges, candidate) else {
				continue;
			};
			let range = &ranges[range_index];
			if range.quality().is_zero() {
				continue;
			}

			let score = (range.quality(), range.specificity(), Reverse(candidate_index));
			if best.as_ref().is_none_or(|(current, _, _)| score > *current) {
				best = Some((score, candidate_index, range_index));
			}
		}

		match best {
			Some((_, candidate_index, range_index)) => NegotiationResult::matched(
				candidates[candidate_index].clone(),
				ranges[range_index].clone(),
			),
			None => NegotiationResult::no_match(),
		}
	}

	/// Best fitness of `mime_type` against `ranges`, with the quality of the
	/// range that produced it. `None` when no range matches.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_negotiation::{MediaRangeMatcher, MediaType};
	///
	/// let ranges = vec![
	///     MediaType::parse("application/*;q=0.5").unwrap(),
	///     MediaType::parse("application/json").unwrap(),
	/// ];
	/// let json = MediaType::parse("application/json").unwrap();
	/// let fq = MediaRangeMatcher::new().fitness_and_quality(&json, &ranges).unwrap();
	/// assert_eq!(fq.fitness, 110);
	/// assert_eq!(fq.quality.thousandths(), 1000);
	/// ```
	pub fn fitness_and_quality(
		&self,
		mime_type: &MediaType,
		ranges: &[MediaType],
	) -> Option<FitnessAndQuality> {
		let mut best: Option<FitnessAndQuality> = None;

		for range in ranges.iter().filter(|r| r.matches(mime_type)) {
			let mut fitness = 0;
			if range.main_type() != "*" {
				fitness += 100;
			}
			if range.subtype() != "*" {
				fitness += 10;
			}
			fitness += range.matching_params(mime_type) as u32;

			if best.is_none_or(|b| fitness > b.fitness) {
				best = Some(FitnessAndQuality {
					fitness,
					quality: range.quality(),
				});
			}
		}

		best
	}

	/// Quality `ranges` give to `mime_type`, 0 when nothing matches.
	pub fn quality(&self, mime_type: &MediaType, ranges: &[MediaType]) -> Quality {
		self.fitness_and_quality(mime_type, ranges)
			.map(|fq| fq.quality)
			.unwrap_or(Quality::ZERO)
	}

	/// Finds the declared type that accepts a request body's `Content-Type`.
	///
	/// Declaration order decides; there is no specificity tie-break since one
	/// declared type is expected to match.
	///
	/// # Examples
	///
	/// ```
	/// use resourceful_negotiation::{MediaRangeMatcher, MediaType};
	///
	/// let supported = vec![MediaType::parse("application/json").unwrap()];
	/// let body = MediaType::parse("application/json; charset=utf-8").unwrap();
	/// let matcher = MediaRangeMatcher::new();
	/// assert_eq!(matcher.content_type_match(&body, &supported).unwrap().essence(), "application/json");
	///
	/// let xml = MediaType::parse("application/xml").unwrap();
	/// assert!(matcher.content_type_match(&xml, &supported).is_none());
	/// ```
	pub fn content_type_match<'a>(
		&self,
		content_type: &MediaType,
		supported: &'a [MediaType],
	) -> Option<&'a MediaType> {
		supported.iter().find(|declared| {
			self.fitness_and_quality(content_type, std::slice::from_ref(*declared))
				.is_some_and(|fq| !fq.quality.is_zero())
		})
	}
}

/// Index of the range that governs `candidate`: highest specificity, then
/// most matching parameters, then earliest in the header.
fn most_specific_range(ranges: &[MediaType], candidate: &MediaType) -> Option<usize> {
	let mut best: Option<((Specificity, usize), usize)> = None;

	for (index, range) in ranges.iter().enumerate() {
		if !range.matches(candidate) {
			continue;
		}
		let key = (range.specificity(), range.matching_params(candidate));
		if best.is_none_or(|(current, _)| key > current) {
			best = Some((key, index));
		}
	}

	best.map(|(_, index)| index)
}
