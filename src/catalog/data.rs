//! Compiled-in catalog data.

use super::{Destination, LocalDeal};

const fn destination(
    id: &'static str,
    title: &'static str,
    subtitle: &'static str,
    image: &'static str,
    description: &'static str,
    price: &'static str,
) -> Destination {
    Destination {
        id,
        title,
        subtitle,
        image,
        description: Some(description),
        price: Some(price),
    }
}

pub static DESTINATIONS: [Destination; 11] = [
    destination("1", "Paris", "City of Lights", "images/paris.jpg",
        "Experience the romance and culture of the French capital", "€299"),
    destination("2", "Tokyo", "Modern Metropolis", "images/tokyo.jpg",
        "Discover the perfect blend of tradition and innovation", "¥45,000"),
    destination("3", "Barcelona", "Architectural Wonder", "images/barcelona.jpg",
        "Explore Gaudí's masterpieces and vibrant street life", "€189"),
    destination("4", "Bali", "Tropical Paradise", "images/bali.jpg",
        "Relax on pristine beaches and immerse in local culture", "Rp 2,500,000"),
    destination("5", "New York", "The Big Apple", "images/newyork.jpg",
        "Feel the energy of the city that never sleeps", "$399"),
    destination("6", "Santorini", "Aegean Gem", "images/santorini.jpg",
        "Watch stunning sunsets over white-washed buildings", "€349"),
    destination("7", "Dubai", "Desert Oasis", "images/dubai.jpg",
        "Luxury shopping and futuristic architecture await", "AED 1,299"),
    destination("8", "Rome", "Eternal City", "images/rome.jpg",
        "Walk through history in the heart of ancient civilization", "€229"),
    destination("9", "Kyoto", "Cultural Heritage", "images/kyoto.jpg",
        "Temples, gardens, and traditional Japanese culture", "¥38,000"),
    destination("10", "Iceland", "Land of Fire and Ice", "images/iceland.jpg",
        "Northern lights, geysers, and breathtaking landscapes", "€449"),
    destination("11", "London", "Historic Capital", "images/london.jpg",
        "Explore royal palaces, world-class museums, and vibrant markets", "£299"),
];

pub static LOCAL_DEALS: [LocalDeal; 5] = [
    LocalDeal {
        id: "1",
        title: "Madrid Tapas Tour",
        discount: "50%",
        description: "Experience authentic Spanish tapas in the heart of Madrid",
    },
    LocalDeal {
        id: "2",
        title: "Barcelona Flamenco Show",
        discount: "30%",
        description: "Enjoy a traditional flamenco performance with dinner",
    },
    LocalDeal {
        id: "3",
        title: "Seville Cathedral Tour",
        discount: "25%",
        description: "Skip-the-line access to the magnificent Seville Cathedral",
    },
    LocalDeal {
        id: "4",
        title: "Valencia Paella Cooking Class",
        discount: "40%",
        description: "Learn to cook authentic paella from local chefs",
    },
    LocalDeal {
        id: "5",
        title: "Granada Alhambra Express",
        discount: "35%",
        description: "Fast-track entry to the stunning Alhambra palace",
    },
];
