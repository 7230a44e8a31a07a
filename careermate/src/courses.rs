//! Static skill-to-course catalog.

use std::collections::HashMap;

use crate::records::CourseRecommendation;

/// Course list returned for a skill the catalog does not know.
pub const NO_COURSES_FOUND: &str = "No courses found";

const BUILTIN: &[(&str, &[&str])] = &[
    ("SQL", &["SQL Basics - Coursera", "Advanced SQL - Udemy", "SQL for Data Science - edX"]),
    (
        "Pandas",
        &["Pandas for Data Analysis - Datacamp", "Data Manipulation with Pandas - Coursera"],
    ),
    ("Statistics", &["Intro to Stats - Khan Academy", "Statistics with R - Coursera"]),
    (
        "Machine Learning",
        &[
            "ML Crash Course - Google",
            "Machine Learning A-Z - Udemy",
            "Deep Learning Specialization - Coursera",
        ],
    ),
    (
        ".NET",
        &[
            "C# Basics for Beginners - Udemy",
            "ASP.NET Core Fundamentals - Pluralsight",
            "Building Web Applications with ASP.NET - Coursera",
        ],
    ),
    (
        "Java",
        &[
            "Java Programming Masterclass - Udemy",
            "Java Fundamentals - Pluralsight",
            "Object Oriented Programming in Java - Coursera",
        ],
    ),
    (
        "C",
        &[
            "C Programming For Beginners - Udemy",
            "Introduction to Programming in C - Coursera",
            "C Fundamentals - Pluralsight",
        ],
    ),
    (
        "C#",
        &[
            "C# Intermediate Programming - Udemy",
            "Learn C# Fundamentals - Microsoft Learn",
            "Advanced C# Programming - Pluralsight",
        ],
    ),
    (
        "Unity",
        &[
            "Unity Game Development Fundamentals - Coursera",
            "Create with Code - Unity Learn",
            "Introduction to Unity - Udemy",
        ],
    ),
];

/// Maps skill names (exact, case-sensitive) to ordered course names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCatalog {
    courses: HashMap<String, Vec<String>>,
}

impl Default for CourseCatalog {
    fn default() -> Self {
        Self::from_entries(BUILTIN.iter().map(|(skill, courses)| (*skill, courses.iter().copied())))
    }
}

impl CourseCatalog {
    pub fn from_entries<I, S, C, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let courses = entries
            .into_iter()
            .map(|(skill, courses)| (skill.into(), courses.into_iter().map(Into::into).collect()))
            .collect();
        Self { courses }
    }

    /// Courses for `skill`, or `["No courses found"]`.
    pub fn courses_for(&self, skill: &str) -> Vec<String> {
        self.courses.get(skill).cloned().unwrap_or_else(|| vec![NO_COURSES_FOUND.to_string()])
    }

    /// One recommendation per requested skill, in request order.
    pub fn recommend(&self, skills: &[String]) -> Vec<CourseRecommendation> {
        skills
            .iter()
            .map(|skill| CourseRecommendation {
                skill: skill.clone(),
                courses: self.courses_for(skill),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}
